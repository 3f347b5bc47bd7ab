//! DTOs de pagos

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::payment::{Payment, PaymentMethod, PaymentStatus};
use crate::services::mercado_pago_service::{CreatedPayment, PayerIdentity};

/// Identidad del pagador exigida por el gateway
#[derive(Debug, Deserialize, Validate)]
pub struct PayerRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 2, max = 100))]
    pub first_name: String,

    /// CPF con o sin puntuación
    #[validate(custom = "crate::utils::validation::validate_cpf")]
    pub document: String,
}

impl From<PayerRequest> for PayerIdentity {
    fn from(payer: PayerRequest) -> Self {
        Self {
            email: payer.email,
            first_name: payer.first_name,
            document: payer.document.chars().filter(|c| c.is_ascii_digit()).collect(),
        }
    }
}

/// Request para crear un pago PIX
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePixPaymentRequest {
    #[validate]
    pub payer: PayerRequest,
}

/// Request para crear un cobro con tarjeta
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCardPaymentRequest {
    #[validate(length(min = 10))]
    pub card_token: String,

    #[validate(range(min = 1, max = 12))]
    pub installments: i32,

    #[validate]
    pub payer: PayerRequest,
}

/// Request para confirmar el pago de una reserva
#[derive(Debug, Deserialize)]
pub struct ConfirmPaymentRequest {
    pub payment_id: Uuid,
}

/// Response al crear un pago: referencia local + artefacto del gateway
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub gateway_payment_id: String,
    pub reservation_id: Option<Uuid>,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_url: Option<String>,
}

impl PaymentResponse {
    pub fn from_parts(payment: Payment, created: Option<CreatedPayment>) -> Self {
        let (qr_code, qr_code_base64, ticket_url) = match created {
            Some(created) => (created.qr_code, created.qr_code_base64, created.ticket_url),
            None => (None, None, None),
        };

        Self {
            id: payment.id,
            gateway_payment_id: payment.gateway_payment_id,
            reservation_id: payment.reservation_id,
            amount: payment.amount,
            status: payment.status,
            payment_method: payment.payment_method,
            created_at: payment.created_at,
            expires_at: payment.expires_at,
            qr_code,
            qr_code_base64,
            ticket_url,
        }
    }
}

/// Response de la consulta puntual de estado
#[derive(Debug, Serialize)]
pub struct PaymentStatusResponse {
    pub payment: PaymentResponse,
    /// Estado crudo reportado por el gateway en esta consulta
    pub gateway_status: String,
}
