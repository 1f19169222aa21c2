/// System instruction injected when markdown output is enabled.
pub const MARKDOWN_SYSTEM_INSTRUCTION: &str = "Always use code blocks with the appropriate language tags. If asked for a table always format it using Markdown syntax.";

const CONTEXT_PREAMBLE: &str = "Answer the users query with the following code snippets from their code repository as your context:";

const CONTEXT_CAVEAT: &str = "Keep in mind that you only need to use this context if it's actually relevant to the context.\nFeel free to mention different options, and if possible mention even the code line numbers.";

/// Interpolates the rendered context block and the verbatim utterance into
/// the fixed augmentation template. An empty context block keeps the same
/// shape so the model always sees the caveat and the literal query.
#[must_use]
pub fn build_augmented_prompt(context_block: &str, utterance: &str) -> String {
    format!(
        "{CONTEXT_PREAMBLE}\n{context_block}\n====\n{CONTEXT_CAVEAT}\nFinally, this is the actual user query that you have to answer: \"{utterance}\""
    )
}
