use crate::domain::model::TrackingLocation;
use crate::utils::error::{Result, ServeError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> ServeError {
    ServeError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Tracking servers are reached over http(s) and need a host.
pub fn validate_server_url(field_name: &str, url_str: &str) -> Result<Url> {
    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("Invalid URL format: {}", e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field_name,
            url_str,
            format!("Unsupported URL scheme: {}", url.scheme()),
        ));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid(field_name, url_str, "URL has no host"));
    }
    Ok(url)
}

/// 追蹤位置可以是 http(s) 伺服器或本機 mlruns 目錄
pub fn validate_tracking_uri(field_name: &str, value: &str) -> Result<()> {
    let location = value.parse::<TrackingLocation>().map_err(|e| match e {
        ServeError::InvalidConfigValueError { value, reason, .. } => {
            invalid(field_name, value, reason)
        }
        other => other,
    })?;

    match location {
        TrackingLocation::Server(url) => validate_server_url(field_name, &url).map(|_| ()),
        TrackingLocation::FileStore(root) => {
            if root.as_os_str().to_string_lossy().contains('\0') {
                return Err(invalid(field_name, value, "Path contains null bytes"));
            }
            Ok(())
        }
    }
}

pub fn validate_at_least(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_bind_host(field_name: &str, host: &str) -> Result<()> {
    if host.trim().is_empty() {
        return Err(invalid(field_name, host, "Host cannot be empty"));
    }
    if host.contains(char::is_whitespace) {
        return Err(invalid(field_name, host, "Host cannot contain whitespace"));
    }
    Ok(())
}
