//! Subject endpoint derivation

use url::Url;

use crate::error::{RegistryClientError, RegistryResult};

/// The registry URLs a client talks to for one subject.
///
/// Computed once at construction; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectEndpoints {
    base: Url,
    versions: Url,
    latest: Url,
    subject: Url,
}

impl SubjectEndpoints {
    /// Derive the endpoints for `subject` under the registry at `base_url`.
    ///
    /// `base_url` must be an absolute `http` or `https` URL. A trailing slash
    /// is absorbed, and `subject` is appended as a single percent-encoded path
    /// segment. Subjects that URL path normalization would drop or fold into
    /// a neighbouring segment (`""`, `"."`, `".."`) are rejected.
    pub fn new(base_url: &str, subject: &str) -> RegistryResult<Self> {
        validate_subject(subject)?;

        let invalid = |reason: &str| RegistryClientError::InvalidUrl {
            url: base_url.to_string(),
            reason: reason.to_string(),
        };

        let base = Url::parse(base_url).map_err(|e| invalid(&e.to_string()))?;
        match base.scheme() {
            "http" | "https" => {}
            other => return Err(invalid(&format!("unsupported scheme {other:?}"))),
        }
        if base.host_str().is_none() {
            return Err(invalid("missing host"));
        }

        let subject_url = join(&base, &["subjects", subject]).map_err(invalid)?;
        let versions = join(&subject_url, &["versions"]).map_err(invalid)?;
        let latest = join(&versions, &["latest"]).map_err(invalid)?;

        Ok(Self {
            base,
            versions,
            latest,
            subject: subject_url,
        })
    }

    /// The registry base URL as parsed.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `POST` target for create and update.
    pub fn versions(&self) -> &Url {
        &self.versions
    }

    /// `GET` target for reading the latest version.
    pub fn latest(&self) -> &Url {
        &self.latest
    }

    /// `DELETE` target.
    pub fn subject(&self) -> &Url {
        &self.subject
    }
}

fn validate_subject(subject: &str) -> RegistryResult<()> {
    let reason = match subject {
        "" => "subject must not be empty",
        "." | ".." => "subject must not be a dot segment",
        _ => return Ok(()),
    };
    Err(RegistryClientError::InvalidSubject {
        subject: subject.to_string(),
        reason: reason.to_string(),
    })
}

fn join(base: &Url, segments: &[&str]) -> Result<Url, &'static str> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| "url cannot be a base")?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
