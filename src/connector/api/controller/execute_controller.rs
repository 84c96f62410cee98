use anyhow::{anyhow, Result};
use serde_json::Value;

use crate::domain::Parameters;

use super::super::Container;

pub struct ExecuteController<'a> {
    container: &'a Container,
}

impl<'a> ExecuteController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn execute(
        &self,
        system_id: String,
        operation: String,
        params: Vec<String>,
    ) -> Result<String> {
        let parameters = parse_params(&params)?;

        let result = self
            .container
            .execute_use_case()
            .execute(&system_id, &operation, &parameters)
            .await?;

        Ok(serde_json::to_string_pretty(&result)?)
    }
}

/// `key=value` pairs; values that parse as JSON keep their type, anything else is a string.
fn parse_params(raw: &[String]) -> Result<Parameters> {
    let mut parameters = Parameters::new();

    for pair in raw {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid parameter '{}', expected key=value", pair))?;

        let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
        parameters.insert(key.trim().to_string(), value);
    }

    Ok(parameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_params_keeps_json_types() {
        let params = parse_params(&[
            "table=users".to_string(),
            "limit=5".to_string(),
            r#"where={"status":"active"}"#.to_string(),
        ])
        .unwrap();

        assert_eq!(params["table"], json!("users"));
        assert_eq!(params["limit"], json!(5));
        assert_eq!(params["where"]["status"], json!("active"));
    }

    #[test]
    fn test_parse_params_rejects_missing_separator() {
        assert!(parse_params(&["table".to_string()]).is_err());
    }
}
