//! Representative provider payloads and a scripted transport for unit tests.
//!
//! Payloads are trimmed copies of real responses: only the fields the
//! normalizers read, plus a few they ignore.

use crate::model::TransportError;
use crate::transport::{HttpRequest, Pacer, Transport};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Scripted transport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Request(String),
    Pause(Duration),
}

/// Replays canned responses in order and records what was sent.
pub struct ScriptedTransport {
    responses: RefCell<VecDeque<Result<Value, TransportError>>>,
    requests: RefCell<Vec<HttpRequest>>,
    events: Rc<RefCell<Vec<Event>>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Result<Value, TransportError>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            requests: RefCell::new(Vec::new()),
            events: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    /// Requests and pauses in the order they happened.
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    /// A pacer that logs into this transport's event timeline instead of sleeping.
    pub fn pacer(&self) -> RecordingPacer {
        RecordingPacer {
            events: Rc::clone(&self.events),
        }
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &HttpRequest) -> Result<Value, TransportError> {
        self.events.borrow_mut().push(Event::Request(request.url.clone()));
        self.requests.borrow_mut().push(request.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted response left".to_string())))
    }
}

pub struct RecordingPacer {
    events: Rc<RefCell<Vec<Event>>>,
}

impl Pacer for RecordingPacer {
    fn pause(&self, duration: Duration) {
        self.events.borrow_mut().push(Event::Pause(duration));
    }
}

pub struct NoPause;

impl Pacer for NoPause {
    fn pause(&self, _duration: Duration) {}
}

pub fn http_error(status: u16) -> TransportError {
    TransportError::Status {
        status,
        url: "https://example.invalid/".to_string(),
    }
}

// ---------------------------------------------------------------------------
// EIA
// ---------------------------------------------------------------------------

pub fn eia_demand_response() -> Value {
    json!({
        "response": {
            "total": 1,
            "dateFormat": "YYYY-MM-DD\"T\"HH24",
            "frequency": "hourly",
            "data": [
                {
                    "period": "2024-01-01T00",
                    "respondent": "US48",
                    "respondent-name": "United States Lower 48",
                    "type": "D",
                    "type-name": "Demand",
                    "value": 12345,
                    "value-units": "megawatthours"
                }
            ]
        },
        "apiVersion": "2.1.7"
    })
}

pub fn eia_generation_response() -> Value {
    json!({
        "response": {
            "data": [
                {
                    "period": "2024-01-01T00",
                    "respondent": "US48",
                    "fueltype": "SUN",
                    "type-name": "Solar",
                    "value": 6789,
                    "value-units": "megawatthours"
                }
            ]
        }
    })
}

// ---------------------------------------------------------------------------
// NOAA / NWS
// ---------------------------------------------------------------------------

pub fn noaa_points_response() -> Value {
    json!({
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": [-74.006, 40.7128] },
        "properties": {
            "cwa": "OKX",
            "forecastOffice": "https://api.weather.gov/offices/OKX",
            "gridId": "OKX",
            "gridX": 33,
            "gridY": 35,
            "forecastHourly": "https://api.weather.gov/gridpoints/OKX/33,35/forecast/hourly"
        }
    })
}

pub fn noaa_forecast_response() -> Value {
    json!({
        "type": "Feature",
        "properties": {
            "units": "us",
            "forecastGenerator": "HourlyForecastGenerator",
            "periods": [
                {
                    "number": 1,
                    "startTime": "2024-01-01T06:00:00-05:00",
                    "endTime": "2024-01-01T07:00:00-05:00",
                    "isDaytime": false,
                    "temperature": 41,
                    "temperatureUnit": "F",
                    "windSpeed": "10 mph",
                    "windDirection": "NW",
                    "shortForecast": "Partly Cloudy"
                },
                {
                    "number": 2,
                    "startTime": "2024-01-01T07:00:00-05:00",
                    "endTime": "2024-01-01T08:00:00-05:00",
                    "isDaytime": true,
                    "temperature": 43,
                    "temperatureUnit": "F",
                    "windSpeed": "5 to 10 mph",
                    "windDirection": "WNW",
                    "shortForecast": "Sunny"
                }
            ]
        }
    })
}

// ---------------------------------------------------------------------------
// OpenWeatherMap
// ---------------------------------------------------------------------------

pub fn openweather_forecast_response() -> Value {
    json!({
        "cod": "200",
        "cnt": 2,
        "list": [
            {
                "dt": 1704067200,
                "main": { "temp": 3.2, "feels_like": -0.4, "humidity": 81 },
                "weather": [{ "id": 803, "main": "Clouds", "description": "broken clouds" }],
                "clouds": { "all": 75 },
                "wind": { "speed": 4.6, "deg": 250, "gust": 8.1 },
                "dt_txt": "2024-01-01 00:00:00"
            },
            {
                "dt": 1704078000,
                "main": { "temp": 2.9, "feels_like": -1.0, "humidity": 88 },
                "weather": [{ "id": 500, "main": "Rain", "description": "light rain" }],
                "clouds": { "all": 100 },
                "wind": { "speed": 5.1 },
                "dt_txt": "2024-01-01 03:00:00"
            }
        ],
        "city": { "name": "New York", "coord": { "lat": 40.7128, "lon": -74.006 } }
    })
}
