//! Outbound submission of the staging table.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

/// Body of one submission: the contract, the operation name and the
/// screen fields of every staged entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payload {
    pub contrato: String,
    pub op: String,
    pub value: Vec<BTreeMap<String, String>>,
}

impl Payload {
    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("server responded with status {status}: {body}")]
    Status { status: u16, body: String },
}

impl SubmitError {
    /// Every failure is shown to the operator the same way.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        "Erro no envio de dados, tente novamente"
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(err) if err.is_timeout())
    }
}

/// Destination of a submission.
pub trait Submitter {
    fn submit(&self, payload: &Payload) -> Result<(), SubmitError>;
}

/// Posts the payload as JSON to a fixed endpoint.
pub struct HttpSubmitter {
    client: Client,
    endpoint: String,
}

impl HttpSubmitter {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, SubmitError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SubmitError::Client)?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Submitter for HttpSubmitter {
    fn submit(&self, payload: &Payload) -> Result<(), SubmitError> {
        debug!(op = %payload.op, records = payload.len(), "posting submission");
        let response = self
            .client
            .post(&self.endpoint)
            .header(USER_AGENT, format!("cardops/{}", env!("CARGO_PKG_VERSION")))
            .json(payload)
            .send()
            .map_err(SubmitError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(status = status.as_u16(), "submission rejected");
            return Err(SubmitError::Status {
                status: status.as_u16(),
                body,
            });
        }
        info!(op = %payload.op, records = payload.len(), "submission accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_serializes_contract_operation_and_values() {
        let payload = Payload {
            contrato: "12345678000190".to_string(),
            op: "Alterar_Status_Cartao".to_string(),
            value: vec![BTreeMap::from([
                ("cpf".to_string(), "52998224725".to_string()),
                ("movimentacao".to_string(), "Ativar".to_string()),
            ])],
        };
        insta::assert_json_snapshot!(payload, @r#"
        {
          "contrato": "12345678000190",
          "op": "Alterar_Status_Cartao",
          "value": [
            {
              "cpf": "52998224725",
              "movimentacao": "Ativar"
            }
          ]
        }
        "#);
    }

    #[test]
    fn every_failure_has_the_same_operator_message() {
        let err = SubmitError::Status {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.user_message(), "Erro no envio de dados, tente novamente");
        assert!(!err.is_timeout());
    }
}
