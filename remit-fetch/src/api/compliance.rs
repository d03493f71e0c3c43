//! `/compliance` endpoints.

use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::request::MultipartForm;

/// An uploaded identity document image.
#[derive(Debug, Clone)]
pub struct KycDocument {
    /// File name reported to the server.
    pub file_name: String,
    /// MIME type, e.g. `image/jpeg`.
    pub mime: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// A KYC submission.
#[derive(Debug, Clone)]
pub struct KycSubmission {
    /// Document type, e.g. `passport` or `national_id`.
    pub document_type: String,
    /// Document number.
    pub document_number: Option<String>,
    /// Front of the document.
    pub front: KycDocument,
    /// Back of the document, if it has one.
    pub back: Option<KycDocument>,
    /// Selfie holding the document.
    pub selfie: Option<KycDocument>,
}

impl KycSubmission {
    /// Builds the multipart form.
    pub fn into_form(self) -> MultipartForm {
        let mut form = MultipartForm::new().text("document_type", self.document_type);
        if let Some(number) = self.document_number {
            form = form.text("document_number", number);
        }

        let files = [
            ("front", Some(self.front)),
            ("back", self.back),
            ("selfie", self.selfie),
        ];
        for (name, document) in files {
            if let Some(doc) = document {
                form = form.file(name, doc.file_name, doc.mime.as_deref(), doc.bytes);
            }
        }
        form
    }
}

/// Compliance endpoints.
#[derive(Debug, Clone, Copy)]
pub struct ComplianceApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ComplianceApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `POST /compliance/kyc/submit` (multipart).
    pub async fn submit_kyc(&self, submission: KycSubmission) -> Result<Value, ApiError> {
        self.client
            .post_multipart("/compliance/kyc/submit", submission.into_form())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::FormPart;

    fn doc(name: &str) -> KycDocument {
        KycDocument {
            file_name: name.into(),
            mime: Some("image/jpeg".into()),
            bytes: vec![0xFF, 0xD8],
        }
    }

    #[test]
    fn test_form_skips_missing_files() {
        let form = KycSubmission {
            document_type: "passport".into(),
            document_number: None,
            front: doc("front.jpg"),
            back: None,
            selfie: Some(doc("selfie.jpg")),
        }
        .into_form();

        let names: Vec<&str> = form
            .parts()
            .iter()
            .map(|p| match p {
                FormPart::Text { name, .. } | FormPart::File { name, .. } => name.as_str(),
            })
            .collect();
        assert_eq!(names, ["document_type", "front", "selfie"]);
    }
}
