/// Render the dish-extraction instruction for one chunk of review text.
///
/// The wording is part of the contract with the model: it asks for verbatim dish names
/// only, as a comma-separated list, or the literal `none`.
pub fn build_prompt(chunk: &str) -> String {
    format!(
        "Extract only names of dishes mentioned exactly as written in the text below.\n\
Do not invent or infer dishes. If none are mentioned, reply 'none'.\n\
Output a comma-separated list.\n\n\
Text: {chunk}\nOutput:"
    )
}
