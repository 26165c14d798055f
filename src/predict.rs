use crate::client::{read_json, send};
use crate::errors::ClientError;
use crate::models::Prediction;
use reqwest::Client;
use serde_json::Value;

/// Client for the separately hosted prediction service.
#[derive(Clone)]
pub struct PredictClient {
    http: Client,
    url: Option<String>,
}

impl PredictClient {
    pub fn new(http: Client, url: Option<String>) -> Self {
        Self { http, url }
    }

    pub async fn predictions(&self, country: i64) -> Result<Vec<Prediction>, ClientError> {
        let url = self
            .url
            .as_deref()
            .ok_or(ClientError::NotConfigured("PREDICT_URL"))?;
        let request = self.http.get(url).query(&[("country", country)]);
        let payload = read_json(send(request, url).await?, url).await?;
        parse_predictions(payload).map_err(|detail| match detail {
            ParseFailure::Shape(detail) => ClientError::Shape {
                url: url.to_string(),
                detail,
            },
            ParseFailure::Decode(source) => ClientError::Decode {
                url: url.to_string(),
                source,
            },
        })
    }
}

enum ParseFailure {
    Shape(String),
    Decode(serde_json::Error),
}

fn parse_predictions(mut payload: Value) -> Result<Vec<Prediction>, ParseFailure> {
    match payload.get_mut("predictions").map(Value::take) {
        Some(predictions @ Value::Array(_)) => {
            serde_json::from_value(predictions).map_err(ParseFailure::Decode)
        }
        _ => Err(ParseFailure::Shape(
            "expected a `predictions` array".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_prediction_array() {
        let parsed = parse_predictions(json!({
            "predictions": [
                {"date": "2021-01-01", "new_cases": 12.5, "new_deaths": 1, "total_cases": 100, "total_deaths": 3}
            ]
        }))
        .ok()
        .unwrap();

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].date, "2021-01-01");
        assert_eq!(parsed[0].new_cases, 12.5);
        assert_eq!(parsed[0].total_deaths, 3.0);
    }

    #[test]
    fn rejects_missing_predictions() {
        assert!(matches!(
            parse_predictions(json!({"result": []})),
            Err(ParseFailure::Shape(_))
        ));
        assert!(matches!(
            parse_predictions(json!({"predictions": {"date": "x"}})),
            Err(ParseFailure::Shape(_))
        ));
        assert!(matches!(
            parse_predictions(json!({"predictions": [{"new_cases": 1}]})),
            Err(ParseFailure::Decode(_))
        ));
    }

    #[tokio::test]
    async fn unconfigured_service_is_an_error() {
        let client = PredictClient::new(Client::new(), None);
        let err = client.predictions(1).await.unwrap_err();
        assert!(matches!(err, ClientError::NotConfigured(_)));
    }
}
