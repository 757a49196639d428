//! Payment request endpoints

use shared::client::ReviewRequest;
use shared::models::{
    PaymentRequest, PaymentRequestCreate, PaymentRequestUpdate, PaymentRequestUpdated,
    RequestFilter, RequestList, ReviewOutcome, UploadedFile,
};

use crate::ClientResult;
use crate::http::HttpClient;

pub struct RequestsApi<'a, C> {
    http: &'a C,
}

impl<'a, C: HttpClient> RequestsApi<'a, C> {
    pub(crate) fn new(http: &'a C) -> Self {
        Self { http }
    }

    /// `GET /payment-requests`
    pub async fn list(&self, filter: &RequestFilter) -> ClientResult<RequestList> {
        self.http.get_query("payment-requests", filter).await
    }

    /// `GET /payment-requests/{id}`
    pub async fn get(&self, id: i64) -> ClientResult<PaymentRequest> {
        self.http.get(&format!("payment-requests/{}", id)).await
    }

    /// `POST /payment-requests`
    pub async fn create(&self, payload: &PaymentRequestCreate) -> ClientResult<PaymentRequest> {
        self.http.post("payment-requests", payload).await
    }

    /// `PUT /payment-requests/{id}`
    pub async fn update(
        &self,
        id: i64,
        changes: &PaymentRequestUpdate,
    ) -> ClientResult<PaymentRequestUpdated> {
        self.http
            .put(&format!("payment-requests/{}", id), changes)
            .await
    }

    /// `POST /payment-requests/{id}/approve`
    pub async fn approve(&self, id: i64, comment: &str) -> ClientResult<ReviewOutcome> {
        self.review(id, "approve", comment).await
    }

    /// `POST /payment-requests/{id}/reject`
    pub async fn reject(&self, id: i64, comment: &str) -> ClientResult<ReviewOutcome> {
        self.review(id, "reject", comment).await
    }

    async fn review(&self, id: i64, action: &str, comment: &str) -> ClientResult<ReviewOutcome> {
        let body = ReviewRequest {
            comment: comment.to_string(),
        };
        self.http
            .post(&format!("payment-requests/{}/{}", id, action), &body)
            .await
    }

    /// `POST /files/upload` (multipart)
    pub async fn upload_file(&self, filename: &str, bytes: Vec<u8>) -> ClientResult<UploadedFile> {
        self.http.upload("files/upload", filename, bytes).await
    }
}
