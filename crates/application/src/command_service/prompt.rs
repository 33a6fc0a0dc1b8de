use warden_domain::CommandAction;

/// Builds the instruction sent to the text-generation model.
///
/// The command text is embedded verbatim between double quotes.
#[must_use]
pub fn build_prompt(command_text: &str) -> String {
    let actions = CommandAction::all()
        .iter()
        .map(|action| format!("\"{}\"", action.as_str()))
        .collect::<Vec<_>>()
        .join("|");

    format!(
        r#"Parse this command into JSON. Command: "{command_text}"

Return ONLY valid JSON (no other text) in exactly this format:
{{"action":{actions},"params":{{"role_name":"name or null","permission_name":"name or null"}}}}

Examples:
- "Create admin role" → {{"action":"create_role","params":{{"role_name":"admin","permission_name":null}}}}
- "Create edit permission" → {{"action":"create_permission","params":{{"role_name":null,"permission_name":"edit"}}}}
- "Give the editor role the publish articles permission" → {{"action":"attach_permission","params":{{"role_name":"editor","permission_name":"publish articles"}}}}
- "Remove publish articles from editor" → {{"action":"detach_permission","params":{{"role_name":"editor","permission_name":"publish articles"}}}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::build_prompt;

    #[test]
    fn prompt_embeds_command_and_every_action() {
        let prompt = build_prompt("Create auditor role");

        assert!(prompt.contains(r#"Command: "Create auditor role""#));
        assert!(prompt.contains(
            r#"{"action":"create_role"|"create_permission"|"attach_permission"|"detach_permission"|"unknown","params":"#
        ));
    }
}
