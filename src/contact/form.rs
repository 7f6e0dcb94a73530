//! Form decoding and submission validation

use std::collections::HashMap;
use std::convert::Infallible;
use std::str::FromStr;

use email_address::EmailAddress;
use hyper::body::Bytes;

pub const DEFAULT_SUBJECT: &str = "New contact message";

pub const NAME_REQUIRED: &str = "Name is required";
pub const EMAIL_REQUIRED: &str = "Valid email is required";
pub const MESSAGE_REQUIRED: &str = "Message is required";

/// Decoded form fields. A repeated field name keeps its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    fields: HashMap<String, String>,
}

impl FormFields {
    /// Decode a request body according to its `Content-Type`.
    ///
    /// Unsupported content types decode to an empty form.
    pub async fn decode(content_type: Option<&str>, body: Bytes) -> multer::Result<Self> {
        let mime = content_type.map(|ct| {
            ct.split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        });

        match (mime.as_deref(), content_type) {
            (None | Some("application/x-www-form-urlencoded"), _) => {
                Ok(Self::from_urlencoded(&body))
            }
            (Some("multipart/form-data"), Some(ct)) => {
                let boundary = multer::parse_boundary(ct)?;
                Self::from_multipart(body, boundary).await
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn from_urlencoded(body: &[u8]) -> Self {
        url::form_urlencoded::parse(body).into_owned().collect()
    }

    /// Text parts only; file uploads are skipped
    pub async fn from_multipart(body: Bytes, boundary: String) -> multer::Result<Self> {
        let stream = futures_util::stream::once(async move { Ok::<Bytes, Infallible>(body) });
        let mut multipart = multer::Multipart::new(stream, boundary);

        let mut fields = HashMap::new();
        while let Some(field) = multipart.next_field().await? {
            if field.file_name().is_some() {
                continue;
            }
            let Some(name) = field.name().map(ToString::to_string) else {
                continue;
            };
            fields.insert(name, field.text().await?);
        }
        Ok(Self { fields })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A validated submission. Every field is trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactSubmission {
    /// Validate all fields, collecting every error rather than stopping at the first
    pub fn from_form(form: &FormFields) -> Result<Self, Vec<String>> {
        let field = |key: &str| form.get(key).map(str::trim).unwrap_or_default().to_string();

        let name = field("name");
        let email = field("email");
        let subject = form
            .get("subject")
            .map_or(DEFAULT_SUBJECT, str::trim)
            .to_string();
        let message = field("message");

        let mut errors = Vec::new();
        if name.is_empty() {
            errors.push(NAME_REQUIRED.to_string());
        }
        if !is_valid_email(&email) {
            errors.push(EMAIL_REQUIRED.to_string());
        }
        if message.is_empty() {
            errors.push(MESSAGE_REQUIRED.to_string());
        }

        if errors.is_empty() {
            Ok(Self {
                name,
                email,
                subject,
                message,
            })
        } else {
            Err(errors)
        }
    }
}

/// A bare addr-spec with a dotted domain: no display name, no domain literal
pub fn is_valid_email(candidate: &str) -> bool {
    if candidate.is_empty() {
        return false;
    }
    EmailAddress::from_str(candidate).is_ok_and(|address| {
        let domain = address.domain();
        address.email() == candidate
            && !address.local_part().is_empty()
            && domain.contains('.')
            && !domain.starts_with('[')
            && !domain.ends_with('.')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> FormFields {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_valid_submission_is_trimmed() {
        let submission = ContactSubmission::from_form(&form(&[
            ("name", "  Jane Doe "),
            ("email", " jane@example.org\n"),
            ("subject", "\tPricing "),
            ("message", "\n Hello there \n"),
        ]))
        .unwrap();
        assert_eq!(submission.name, "Jane Doe");
        assert_eq!(submission.email, "jane@example.org");
        assert_eq!(submission.subject, "Pricing");
        assert_eq!(submission.message, "Hello there");
    }

    #[test]
    fn test_subject_defaults_only_when_absent() {
        let base = [
            ("name", "Jane"),
            ("email", "jane@example.org"),
            ("message", "Hi"),
        ];
        let absent = ContactSubmission::from_form(&form(&base)).unwrap();
        assert_eq!(absent.subject, DEFAULT_SUBJECT);

        let mut pairs = base.to_vec();
        pairs.push(("subject", "   "));
        let explicit = ContactSubmission::from_form(&form(&pairs)).unwrap();
        assert_eq!(explicit.subject, "");
    }

    #[test]
    fn test_all_errors_collected_in_order() {
        let errors = ContactSubmission::from_form(&FormFields::default()).unwrap_err();
        assert_eq!(errors, vec![NAME_REQUIRED, EMAIL_REQUIRED, MESSAGE_REQUIRED]);

        let errors = ContactSubmission::from_form(&form(&[
            ("name", "   "),
            ("email", "jane@example.org"),
            ("message", " "),
        ]))
        .unwrap_err();
        assert_eq!(errors, vec![NAME_REQUIRED, MESSAGE_REQUIRED]);
    }

    #[test]
    fn test_bad_email_is_the_only_error() {
        let errors = ContactSubmission::from_form(&form(&[
            ("name", "Jane"),
            ("email", "not-an-email"),
            ("message", "Hi"),
        ]))
        .unwrap_err();
        assert_eq!(errors, vec![EMAIL_REQUIRED]);
    }

    #[test]
    fn test_email_syntax() {
        for good in ["jane@example.org", "first.last+tag@mail.example.co.uk", "a_b@sub.example.io"] {
            assert!(is_valid_email(good), "{good} should be valid");
        }
        for bad in [
            "",
            "not-an-email",
            "@example.org",
            "jane@",
            "jane@localhost",
            "jane@[127.0.0.1]",
            "Jane <jane@example.org>",
            "jane@@example.org",
            "jane doe@example.org",
        ] {
            assert!(!is_valid_email(bad), "{bad} should be invalid");
        }
    }

    #[test]
    fn test_urlencoded_decoding() {
        let fields = FormFields::from_urlencoded(
            b"name=Jane+Doe&email=jane%40example.org&message=a%26b%3Dc&name=Janet",
        );
        assert_eq!(fields.get("name"), Some("Janet"));
        assert_eq!(fields.get("email"), Some("jane@example.org"));
        assert_eq!(fields.get("message"), Some("a&b=c"));
        assert_eq!(fields.get("subject"), None);
    }

    #[tokio::test]
    async fn test_decode_by_content_type() {
        let body = Bytes::from_static(b"name=Jane");
        let urlencoded = FormFields::decode(
            Some("application/x-www-form-urlencoded; charset=UTF-8"),
            body.clone(),
        )
        .await
        .unwrap();
        assert_eq!(urlencoded.get("name"), Some("Jane"));

        let untyped = FormFields::decode(None, body.clone()).await.unwrap();
        assert_eq!(untyped.get("name"), Some("Jane"));

        let json = FormFields::decode(Some("application/json"), body).await.unwrap();
        assert_eq!(json, FormFields::default());
    }

    #[tokio::test]
    async fn test_multipart_decoding() {
        let body = "--XyZ\r\n\
            Content-Disposition: form-data; name=\"name\"\r\n\r\n\
            Jane\r\n\
            --XyZ\r\n\
            Content-Disposition: form-data; name=\"attachment\"; filename=\"cv.txt\"\r\n\
            Content-Type: text/plain\r\n\r\n\
            file contents\r\n\
            --XyZ\r\n\
            Content-Disposition: form-data; name=\"message\"\r\n\r\n\
            Line one\nLine two\r\n\
            --XyZ--\r\n";
        let fields = FormFields::decode(
            Some("multipart/form-data; boundary=XyZ"),
            Bytes::from(body),
        )
        .await
        .unwrap();
        assert_eq!(fields.get("name"), Some("Jane"));
        assert_eq!(fields.get("message"), Some("Line one\nLine two"));
        assert_eq!(fields.get("attachment"), None);
    }

    #[tokio::test]
    async fn test_multipart_without_boundary_is_an_error() {
        let result = FormFields::decode(Some("multipart/form-data"), Bytes::new()).await;
        assert!(result.is_err());
    }
}
