//! Best-effort recovery of a [`ParsedCommand`] from raw model text.
//!
//! Stages run in order on the fence-stripped text and the first one that
//! yields a command wins. Total failure degrades to the unknown command.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use warden_domain::{CommandAction, CommandParams, ParsedCommand};

type Pattern = LazyLock<Result<Regex, regex::Error>>;

static JSON_CODE_FENCE: Pattern = LazyLock::new(|| Regex::new(r"```json\n?"));

static CODE_FENCE: Pattern = LazyLock::new(|| Regex::new(r"```\n?"));

// One level of nested braces is enough for `{"action":..,"params":{..}}`.
static EMBEDDED_OBJECT: Pattern =
    LazyLock::new(|| Regex::new(r"\{[^{}]*(?:\{[^{}]*\}[^{}]*)*\}"));

static ACTION_FIELD: Pattern = LazyLock::new(|| Regex::new(r#""action"\s*:\s*"([^"]+)""#));

static ROLE_NAME_FIELD: Pattern = LazyLock::new(|| Regex::new(r#""role_name"\s*:\s*"([^"]+)""#));

static PERMISSION_NAME_FIELD: Pattern =
    LazyLock::new(|| Regex::new(r#""permission_name"\s*:\s*"([^"]+)""#));

type Extractor = fn(&str) -> Option<ParsedCommand>;

const STAGES: [(&str, Extractor); 3] = [
    ("strict_json", parse_strict_json),
    ("embedded_object", parse_embedded_object),
    ("field_scan", scan_fields),
];

/// Recovers a command from raw model output. Never fails.
#[must_use]
pub fn extract_command(raw_output: &str) -> ParsedCommand {
    let cleaned = strip_code_fences(raw_output);

    STAGES
        .iter()
        .find_map(|(stage, extractor)| {
            extractor(&cleaned).inspect(|_| debug!(stage, "recovered command from model output"))
        })
        .unwrap_or_else(|| {
            debug!("model output held no recognisable command");
            ParsedCommand::unknown()
        })
}

fn compiled(pattern: &'static Pattern) -> Option<&'static Regex> {
    match pattern.as_ref() {
        Ok(regex) => Some(regex),
        Err(error) => {
            warn!(%error, "command extraction pattern failed to compile");
            None
        }
    }
}

fn strip_code_fences(raw_output: &str) -> String {
    let without_json_fences = match compiled(&JSON_CODE_FENCE) {
        Some(regex) => regex.replace_all(raw_output, ""),
        None => Cow::Borrowed(raw_output),
    };

    let without_fences = match compiled(&CODE_FENCE) {
        Some(regex) => regex.replace_all(&without_json_fences, "").into_owned(),
        None => without_json_fences.into_owned(),
    };

    without_fences.trim().to_owned()
}

fn parse_strict_json(text: &str) -> Option<ParsedCommand> {
    let value = serde_json::from_str::<Value>(text).ok()?;
    value.as_object().map(command_from_object)
}

fn parse_embedded_object(text: &str) -> Option<ParsedCommand> {
    let candidate = compiled(&EMBEDDED_OBJECT)?.find(text)?;
    parse_strict_json(candidate.as_str())
}

fn scan_fields(text: &str) -> Option<ParsedCommand> {
    let action = capture(&ACTION_FIELD, text)?;

    Some(ParsedCommand::new(
        CommandAction::parse(action),
        CommandParams::from_raw(
            capture(&ROLE_NAME_FIELD, text),
            capture(&PERMISSION_NAME_FIELD, text),
        ),
    ))
}

fn capture<'t>(pattern: &'static Pattern, text: &'t str) -> Option<&'t str> {
    compiled(pattern)?
        .captures(text)?
        .get(1)
        .map(|matched| matched.as_str())
}

fn command_from_object(object: &Map<String, Value>) -> ParsedCommand {
    let action = object
        .get("action")
        .and_then(Value::as_str)
        .map_or(CommandAction::Unknown, CommandAction::parse);

    let params = object.get("params").and_then(Value::as_object);
    let role_name = params.and_then(|params| param_text(params.get("role_name")));
    let permission_name = params.and_then(|params| param_text(params.get("permission_name")));

    ParsedCommand::new(
        action,
        CommandParams::from_raw(role_name.as_deref(), permission_name.as_deref()),
    )
}

fn param_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
