//! `/payments`

use optica_core::payment::{PayInstallmentRequest, PaymentRequest, PaymentSummary};
use optica_core::{EntityId, Payment, Sale};
use tracing::info;

use super::today;
use crate::error::ApiResult;
use crate::http::HttpClient;

pub struct PaymentsApi<'a> {
    http: &'a HttpClient,
}

impl<'a> PaymentsApi<'a> {
    pub(crate) fn new(http: &'a HttpClient) -> Self {
        PaymentsApi { http }
    }

    pub async fn for_sale(&self, sale_id: EntityId) -> ApiResult<Vec<Payment>> {
        self.http.get_data(&format!("/sales/{sale_id}/payments")).await
    }

    /// Paid and remaining balance of a sale.
    pub async fn summary(&self, sale: &Sale) -> ApiResult<PaymentSummary> {
        let payments = self.for_sale(sale.id).await?;
        Ok(PaymentSummary::for_sale(sale.total, &payments))
    }

    /// Registers a payment built with [`PaymentRequest::single`] or
    /// [`PaymentRequest::financed`].
    pub async fn create(&self, request: &PaymentRequest) -> ApiResult<Payment> {
        let payment: Payment = self.http.post_data("/payments", request).await?;
        info!(
            sale_id = payment.sale_id,
            payment_id = payment.id,
            amount = %payment.amount,
            installments = payment.installments.len(),
            "Payment registered"
        );
        Ok(payment)
    }

    /// Marks one installment paid today.
    pub async fn pay_installment(&self, payment_id: EntityId, installment_id: EntityId) -> ApiResult<Payment> {
        let body = PayInstallmentRequest { paid_at: today() };
        self.http
            .patch_data(
                &format!("/payments/{payment_id}/installments/{installment_id}/pay"),
                &body,
            )
            .await
    }
}
