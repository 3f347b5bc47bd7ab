//! Integración con Mercado Pago
//!
//! Wrapper fino request/response sobre la API de pagos de Mercado Pago
//! (PIX y tarjeta). El core solo guarda la referencia: id del gateway y
//! estado. El polling es acotado y determinista - termina siempre en
//! aprobado, rechazado o timeout, nunca cuelga.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::environment::EnvironmentConfig;
use crate::utils::errors::{AppError, AppResult};

/// Identidad del pagador exigida por el gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayerIdentity {
    pub email: String,
    pub first_name: String,
    /// CPF, solo dígitos
    pub document: String,
}

/// Estado reportado por el gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayPaymentStatus {
    Approved,
    Pending,
    InProcess,
    Rejected,
    Cancelled,
    Other(String),
}

impl GatewayPaymentStatus {
    pub fn from_api(status: &str) -> Self {
        match status {
            "approved" => GatewayPaymentStatus::Approved,
            "pending" => GatewayPaymentStatus::Pending,
            "in_process" | "authorized" => GatewayPaymentStatus::InProcess,
            "rejected" => GatewayPaymentStatus::Rejected,
            "cancelled" => GatewayPaymentStatus::Cancelled,
            other => GatewayPaymentStatus::Other(other.to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GatewayPaymentStatus::Approved
                | GatewayPaymentStatus::Rejected
                | GatewayPaymentStatus::Cancelled
        )
    }

    pub fn as_api_str(&self) -> &str {
        match self {
            GatewayPaymentStatus::Approved => "approved",
            GatewayPaymentStatus::Pending => "pending",
            GatewayPaymentStatus::InProcess => "in_process",
            GatewayPaymentStatus::Rejected => "rejected",
            GatewayPaymentStatus::Cancelled => "cancelled",
            GatewayPaymentStatus::Other(status) => status,
        }
    }
}

/// Artefacto devuelto al crear un pago
#[derive(Debug, Clone, Serialize)]
pub struct CreatedPayment {
    pub gateway_payment_id: String,
    pub status: String,
    /// Payload PIX copia-e-cola (solo PIX)
    pub qr_code: Option<String>,
    pub qr_code_base64: Option<String>,
    pub ticket_url: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Estado consultado de un pago existente
#[derive(Debug, Clone)]
pub struct GatewayPayment {
    pub status: GatewayPaymentStatus,
    pub amount: Decimal,
    pub approved_at: Option<DateTime<Utc>>,
}

/// Resultado del polling acotado
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Approved,
    Rejected,
    TimedOut,
}

/// Operaciones consumidas del gateway de pagos. El trait permite un
/// fake en memoria para los tests del polling y de la confirmación.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_pix_payment(
        &self,
        amount: Decimal,
        payer: &PayerIdentity,
        external_reference: &str,
    ) -> AppResult<CreatedPayment>;

    async fn create_card_payment(
        &self,
        amount: Decimal,
        card_token: &str,
        installments: i32,
        payer: &PayerIdentity,
        external_reference: &str,
    ) -> AppResult<CreatedPayment>;

    async fn get_payment(&self, gateway_payment_id: &str) -> AppResult<GatewayPayment>;
}

/// Polling caller-driven: una consulta por intento, con tope fijo de
/// intentos. La cadencia la pone quien llama - el core no es dueño de
/// ningún timer.
pub async fn poll_payment<G: PaymentGateway + ?Sized>(
    gateway: &G,
    gateway_payment_id: &str,
    max_attempts: u32,
    interval: std::time::Duration,
) -> AppResult<PollOutcome> {
    for attempt in 1..=max_attempts {
        let payment = gateway.get_payment(gateway_payment_id).await?;

        match payment.status {
            GatewayPaymentStatus::Approved => return Ok(PollOutcome::Approved),
            GatewayPaymentStatus::Rejected | GatewayPaymentStatus::Cancelled => {
                return Ok(PollOutcome::Rejected)
            }
            _ => {}
        }

        if attempt < max_attempts {
            tokio::time::sleep(interval).await;
        }
    }

    Ok(PollOutcome::TimedOut)
}

/// Gateway sin configurar: cualquier operación de pago falla con un
/// error claro, pero el resto de la API sigue funcionando
pub struct UnconfiguredGateway;

#[async_trait]
impl PaymentGateway for UnconfiguredGateway {
    async fn create_pix_payment(
        &self,
        _amount: Decimal,
        _payer: &PayerIdentity,
        _external_reference: &str,
    ) -> AppResult<CreatedPayment> {
        Err(AppError::Gateway(
            "MERCADOPAGO_ACCESS_TOKEN not configured".to_string(),
        ))
    }

    async fn create_card_payment(
        &self,
        _amount: Decimal,
        _card_token: &str,
        _installments: i32,
        _payer: &PayerIdentity,
        _external_reference: &str,
    ) -> AppResult<CreatedPayment> {
        Err(AppError::Gateway(
            "MERCADOPAGO_ACCESS_TOKEN not configured".to_string(),
        ))
    }

    async fn get_payment(&self, _gateway_payment_id: &str) -> AppResult<GatewayPayment> {
        Err(AppError::Gateway(
            "MERCADOPAGO_ACCESS_TOKEN not configured".to_string(),
        ))
    }
}

// ---------------------------------------------------------------------------
// Cliente HTTP real
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct MercadoPagoIdentification {
    #[serde(rename = "type")]
    id_type: String,
    number: String,
}

#[derive(Debug, Serialize)]
struct MercadoPagoPayer {
    email: String,
    first_name: String,
    identification: MercadoPagoIdentification,
}

#[derive(Debug, Serialize)]
struct MercadoPagoCreateRequest {
    transaction_amount: f64,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_method_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    installments: Option<i32>,
    external_reference: String,
    payer: MercadoPagoPayer,
}

#[derive(Debug, Deserialize)]
struct MercadoPagoPaymentResponse {
    id: i64,
    status: String,
    #[serde(default)]
    transaction_amount: Option<f64>,
    #[serde(default)]
    date_approved: Option<DateTime<Utc>>,
    #[serde(default)]
    date_of_expiration: Option<DateTime<Utc>>,
    #[serde(default)]
    point_of_interaction: Option<MercadoPagoPointOfInteraction>,
}

#[derive(Debug, Deserialize)]
struct MercadoPagoPointOfInteraction {
    #[serde(default)]
    transaction_data: Option<MercadoPagoTransactionData>,
}

#[derive(Debug, Deserialize)]
struct MercadoPagoTransactionData {
    #[serde(default)]
    qr_code: Option<String>,
    #[serde(default)]
    qr_code_base64: Option<String>,
    #[serde(default)]
    ticket_url: Option<String>,
}

/// Cliente real contra la API de Mercado Pago
pub struct MercadoPagoService {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl MercadoPagoService {
    pub fn new(config: &EnvironmentConfig) -> AppResult<Self> {
        let access_token = config
            .mercadopago_access_token
            .clone()
            .ok_or_else(|| AppError::Gateway("MERCADOPAGO_ACCESS_TOKEN not configured".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .map_err(|e| AppError::Gateway(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.mercadopago_base_url.clone(),
            access_token,
        })
    }

    fn amount_to_f64(amount: Decimal) -> AppResult<f64> {
        amount
            .to_f64()
            .ok_or_else(|| AppError::Gateway(format!("Invalid payment amount: {}", amount)))
    }

    async fn post_payment(
        &self,
        request: &MercadoPagoCreateRequest,
    ) -> AppResult<MercadoPagoPaymentResponse> {
        let url = format!("{}/v1/payments", self.base_url);
        tracing::info!("💳 Creando pago en Mercado Pago: {}", request.external_reference);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .header("X-Idempotency-Key", Uuid::new_v4().to_string())
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::Gateway(format!("Payment request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("❌ Mercado Pago devolvió {}: {}", status, error_text);
            return Err(AppError::Gateway(format!(
                "Gateway returned {}: {}",
                status, error_text
            )));
        }

        response
            .json::<MercadoPagoPaymentResponse>()
            .await
            .map_err(|e| AppError::Gateway(format!("Failed to parse gateway response: {}", e)))
    }
}

#[async_trait]
impl PaymentGateway for MercadoPagoService {
    async fn create_pix_payment(
        &self,
        amount: Decimal,
        payer: &PayerIdentity,
        external_reference: &str,
    ) -> AppResult<CreatedPayment> {
        let request = MercadoPagoCreateRequest {
            transaction_amount: Self::amount_to_f64(amount)?,
            description: format!("Reserva de estacionamento {}", external_reference),
            payment_method_id: Some("pix".to_string()),
            token: None,
            installments: None,
            external_reference: external_reference.to_string(),
            payer: MercadoPagoPayer {
                email: payer.email.clone(),
                first_name: payer.first_name.clone(),
                identification: MercadoPagoIdentification {
                    id_type: "CPF".to_string(),
                    number: payer.document.clone(),
                },
            },
        };

        let response = self.post_payment(&request).await?;

        let transaction_data = response
            .point_of_interaction
            .and_then(|poi| poi.transaction_data);

        // Un PIX sin payload de QR no sirve para cobrar
        let (qr_code, qr_code_base64, ticket_url) = match transaction_data {
            Some(data) if data.qr_code.is_some() => {
                (data.qr_code, data.qr_code_base64, data.ticket_url)
            }
            _ => {
                return Err(AppError::Gateway(
                    "Gateway response missing PIX QR payload".to_string(),
                ))
            }
        };

        Ok(CreatedPayment {
            gateway_payment_id: response.id.to_string(),
            status: response.status,
            qr_code,
            qr_code_base64,
            ticket_url,
            expires_at: response.date_of_expiration,
        })
    }

    async fn create_card_payment(
        &self,
        amount: Decimal,
        card_token: &str,
        installments: i32,
        payer: &PayerIdentity,
        external_reference: &str,
    ) -> AppResult<CreatedPayment> {
        let request = MercadoPagoCreateRequest {
            transaction_amount: Self::amount_to_f64(amount)?,
            description: format!("Reserva de estacionamento {}", external_reference),
            payment_method_id: None,
            token: Some(card_token.to_string()),
            installments: Some(installments),
            external_reference: external_reference.to_string(),
            payer: MercadoPagoPayer {
                email: payer.email.clone(),
                first_name: payer.first_name.clone(),
                identification: MercadoPagoIdentification {
                    id_type: "CPF".to_string(),
                    number: payer.document.clone(),
                },
            },
        };

        let response = self.post_payment(&request).await?;

        Ok(CreatedPayment {
            gateway_payment_id: response.id.to_string(),
            status: response.status,
            qr_code: None,
            qr_code_base64: None,
            ticket_url: None,
            expires_at: response.date_of_expiration,
        })
    }

    async fn get_payment(&self, gateway_payment_id: &str) -> AppResult<GatewayPayment> {
        let url = format!("{}/v1/payments/{}", self.base_url, gateway_payment_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| AppError::Gateway(format!("Payment status request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!(
                "Payment '{}' not found at gateway",
                gateway_payment_id
            )));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Gateway(format!(
                "Gateway returned {}: {}",
                status, error_text
            )));
        }

        let payment = response
            .json::<MercadoPagoPaymentResponse>()
            .await
            .map_err(|e| AppError::Gateway(format!("Failed to parse gateway response: {}", e)))?;

        let amount = payment
            .transaction_amount
            .and_then(Decimal::from_f64_retain)
            .unwrap_or(Decimal::ZERO);

        Ok(GatewayPayment {
            status: GatewayPaymentStatus::from_api(&payment.status),
            amount,
            approved_at: payment.date_approved,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Fake en memoria: devuelve una secuencia fija de estados
    struct FakeGateway {
        statuses: Mutex<Vec<GatewayPaymentStatus>>,
    }

    impl FakeGateway {
        fn with_statuses(statuses: Vec<GatewayPaymentStatus>) -> Self {
            Self {
                statuses: Mutex::new(statuses),
            }
        }
    }

    #[async_trait]
    impl PaymentGateway for FakeGateway {
        async fn create_pix_payment(
            &self,
            _amount: Decimal,
            _payer: &PayerIdentity,
            _external_reference: &str,
        ) -> AppResult<CreatedPayment> {
            unimplemented!("not needed for poll tests")
        }

        async fn create_card_payment(
            &self,
            _amount: Decimal,
            _card_token: &str,
            _installments: i32,
            _payer: &PayerIdentity,
            _external_reference: &str,
        ) -> AppResult<CreatedPayment> {
            unimplemented!("not needed for poll tests")
        }

        async fn get_payment(&self, _gateway_payment_id: &str) -> AppResult<GatewayPayment> {
            let mut statuses = self.statuses.lock().unwrap();
            let status = if statuses.len() > 1 {
                statuses.remove(0)
            } else {
                statuses[0].clone()
            };
            Ok(GatewayPayment {
                status,
                amount: Decimal::new(1400, 2),
                approved_at: None,
            })
        }
    }

    #[tokio::test]
    async fn test_poll_stops_on_approval() {
        let gateway = FakeGateway::with_statuses(vec![
            GatewayPaymentStatus::Pending,
            GatewayPaymentStatus::Pending,
            GatewayPaymentStatus::Approved,
        ]);

        let outcome = poll_payment(&gateway, "123", 10, std::time::Duration::from_millis(1))
            .await
            .unwrap();
        assert_eq!(outcome, PollOutcome::Approved);
    }

    #[tokio::test]
    async fn test_poll_stops_on_rejection() {
        let gateway = FakeGateway::with_statuses(vec![
            GatewayPaymentStatus::Pending,
            GatewayPaymentStatus::Rejected,
        ]);

        let outcome = poll_payment(&gateway, "123", 10, std::time::Duration::from_millis(1))
            .await
            .unwrap();
        assert_eq!(outcome, PollOutcome::Rejected);
    }

    #[tokio::test]
    async fn test_poll_times_out_after_max_attempts() {
        let gateway = FakeGateway::with_statuses(vec![GatewayPaymentStatus::Pending]);

        let outcome = poll_payment(&gateway, "123", 3, std::time::Duration::from_millis(1))
            .await
            .unwrap();
        assert_eq!(outcome, PollOutcome::TimedOut);
    }

    #[test]
    fn test_status_from_api() {
        assert_eq!(
            GatewayPaymentStatus::from_api("approved"),
            GatewayPaymentStatus::Approved
        );
        assert_eq!(
            GatewayPaymentStatus::from_api("in_process"),
            GatewayPaymentStatus::InProcess
        );
        assert!(!GatewayPaymentStatus::Pending.is_terminal());
        assert!(GatewayPaymentStatus::Approved.is_terminal());
    }
}
