use serde::{Deserialize, Serialize};

const MS_TO_KMH: f64 = 3.6;

/// Current conditions, as served to clients and cached.
///
/// Wind speed is in km/h and temperature in degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub wind_speed: i32,
    pub temperature_degrees: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherStackResponse {
    pub current: WeatherStackCurrent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherStackCurrent {
    pub wind_speed: i32,
    pub temperature: i32,
}

// weatherstack reports most failures with HTTP 200 and this body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherStackErrorResponse {
    pub success: bool,
    pub error: WeatherStackError,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherStackError {
    pub code: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub info: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenWeatherResponse {
    pub main: OpenWeatherMain,
    pub wind: OpenWeatherWind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenWeatherMain {
    pub temp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenWeatherWind {
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenWeatherErrorResponse {
    // OpenWeather sends "cod" as either a number or a string
    pub cod: serde_json::Value,
    pub message: String,
}

impl From<&WeatherStackResponse> for WeatherReading {
    fn from(resp: &WeatherStackResponse) -> Self {
        Self {
            wind_speed: resp.current.wind_speed,
            temperature_degrees: resp.current.temperature,
        }
    }
}

impl From<&OpenWeatherResponse> for WeatherReading {
    fn from(resp: &OpenWeatherResponse) -> Self {
        Self {
            // OpenWeather's metric units report wind in m/s
            wind_speed: (resp.wind.speed * MS_TO_KMH).round() as i32,
            temperature_degrees: resp.main.temp.round() as i32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_serializes_with_public_field_names() {
        let reading = WeatherReading {
            wind_speed: 20,
            temperature_degrees: 10,
        };
        let json = serde_json::to_value(reading).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"wind_speed": 20, "temperature_degrees": 10})
        );
    }

    #[test]
    fn test_openweather_values_are_converted_and_rounded() {
        let resp = OpenWeatherResponse {
            main: OpenWeatherMain { temp: 17.62 },
            wind: OpenWeatherWind { speed: 4.4 },
        };
        let reading = WeatherReading::from(&resp);
        assert_eq!(reading.temperature_degrees, 18);
        // 4.4 m/s is 15.84 km/h
        assert_eq!(reading.wind_speed, 16);
    }

    #[test]
    fn test_weatherstack_error_body_parses() {
        let body = serde_json::json!({
            "success": false,
            "error": {"code": 101, "type": "invalid_access_key", "info": "bad key"}
        });
        let parsed: WeatherStackErrorResponse = serde_json::from_value(body).unwrap();
        assert!(!parsed.success);
        assert_eq!(parsed.error.kind, "invalid_access_key");
    }
}
