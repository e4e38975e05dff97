//! JSON envelope on stdout and exit codes per error family.

use i18n_sweep::{Error, ErrorCode, Result};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
struct Envelope {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorBody>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    details: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    hints: Vec<String>,
    /// Targets a sweep had already rewritten when it stopped.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    changed_before_error: Vec<String>,
}

impl ErrorBody {
    fn from_error(err: Error) -> Self {
        let mut details = err.details;
        let changed_before_error = match details.as_object_mut().and_then(|m| m.remove("changed")) {
            Some(changed) => serde_json::from_value(changed).unwrap_or_default(),
            None => Vec::new(),
        };

        Self {
            code: err.code.as_str(),
            message: err.message,
            details,
            hints: err.hints.into_iter().map(|h| h.message).collect(),
            changed_before_error,
        }
    }
}

fn envelope(result: Result<Value>) -> Envelope {
    match result {
        Ok(data) => Envelope {
            success: true,
            data: Some(data),
            error: None,
        },
        Err(err) => Envelope {
            success: false,
            data: None,
            error: Some(ErrorBody::from_error(err)),
        },
    }
}

/// Print `result` as a pretty JSON envelope on stdout.
pub fn print_result(result: Result<Value>) -> Result<()> {
    use std::io::{self, Write};

    let payload = serde_json::to_string_pretty(&envelope(result))
        .map_err(|e| Error::internal_json(e.to_string(), Some("serialize response".to_string())))?;

    let mut handle = io::stdout().lock();
    match writeln!(handle, "{}", payload) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(e) => Err(Error::internal_io(e.to_string(), Some("write stdout".to_string()))),
    }
}

/// Turn a handler's typed output into JSON plus the process exit code.
pub fn map_cmd_result_to_json<T: Serialize>(
    result: Result<(T, i32)>,
) -> (Result<Value>, i32) {
    match result {
        Ok((data, exit_code)) => match serde_json::to_value(data) {
            Ok(value) => (Ok(value), exit_code),
            Err(err) => (
                Err(Error::internal_json(
                    err.to_string(),
                    Some("serialize response".to_string()),
                )),
                1,
            ),
        },
        Err(err) => {
            let exit_code = exit_code_for_error(err.code);
            (Err(err), exit_code)
        }
    }
}

pub fn exit_code_for_error(code: ErrorCode) -> i32 {
    match code {
        ErrorCode::ConfigInvalidJson
        | ErrorCode::ConfigInvalidToml
        | ErrorCode::ConfigInvalidValue
        | ErrorCode::ValidationInvalidArgument
        | ErrorCode::ValidationInvalidPattern => 2,

        ErrorCode::PresetNotFound => 4,

        ErrorCode::InternalIoError | ErrorCode::InternalJsonError => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(result: Result<Value>) -> Value {
        serde_json::to_value(envelope(result)).unwrap()
    }

    #[test]
    fn error_envelope_carries_code_and_hints() {
        let err = Error::preset_not_found("nope", vec!["text-literals".to_string()]);
        let json = render(Err(err));

        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "preset.not_found");
        assert!(json["error"]["hints"][0]
            .as_str()
            .unwrap()
            .contains("i18n-sweep presets"));
        assert!(json.get("data").is_none());
    }

    #[test]
    fn success_envelope_wraps_data() {
        let json = render(Ok(serde_json::json!({ "total_changed": 0 })));
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["total_changed"], 0);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn changed_targets_move_out_of_details() {
        let err = Error::internal_io("stream did not contain valid UTF-8", Some("read zzz/page.tsx".to_string()))
            .with_detail("changed", vec!["aaa", "bbb"]);
        let json = render(Err(err));

        assert_eq!(json["error"]["changed_before_error"], serde_json::json!(["aaa", "bbb"]));
        assert!(json["error"]["details"].get("changed").is_none());
        assert_eq!(json["error"]["details"]["context"], "read zzz/page.tsx");
    }

    #[test]
    fn clean_failure_has_no_changed_field() {
        let json = render(Err(Error::internal_io("denied", None)));
        assert!(json["error"].get("changed_before_error").is_none());
        assert!(json["error"].get("hints").is_none());
    }

    #[test]
    fn exit_codes_follow_error_family() {
        assert_eq!(exit_code_for_error(ErrorCode::ValidationInvalidPattern), 2);
        assert_eq!(exit_code_for_error(ErrorCode::ConfigInvalidToml), 2);
        assert_eq!(exit_code_for_error(ErrorCode::PresetNotFound), 4);
        assert_eq!(exit_code_for_error(ErrorCode::InternalIoError), 1);
    }

    #[test]
    fn io_error_maps_to_exit_code_1() {
        let err = Error::internal_io("permission denied", Some("write a/page.tsx".to_string()));
        let (value, exit_code) = map_cmd_result_to_json::<Value>(Err(err));
        assert!(value.is_err());
        assert_eq!(exit_code, 1);
    }
}
