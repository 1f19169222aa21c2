use std::path::Path;

use serde::Deserialize;

use crate::error::SearchError;

/// One contiguous block of matched source lines, path already rewritten
/// relative to the repository root. Consumed only to build the augmented
/// prompt; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSnippet {
    pub path: String,
    pub start_line: u32,
    pub end_line: u32,
    pub lines: Vec<String>,
}

/// Wire shape of a search-service query response.
#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    pub results: Vec<QueryResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueryResult {
    pub path: String,
    #[serde(default)]
    pub blocks: Vec<QueryBlock>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueryBlock {
    pub lines: Vec<QueryLine>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueryLine {
    pub line: u32,
    #[serde(rename = "lineText")]
    pub line_text: String,
}

/// Flattens a query response into snippets, one per block, in the order
/// received.
pub(crate) fn snippets_from_response(
    response: QueryResponse,
    repo_root: &Path,
) -> Result<Vec<ContextSnippet>, SearchError> {
    let mut snippets = Vec::new();

    for result in response.results {
        let path = relative_to_repo(&result.path, repo_root);
        for block in result.blocks {
            let (Some(first), Some(last)) = (block.lines.first(), block.lines.last()) else {
                return Err(SearchError::Malformed(format!(
                    "result for '{path}' contains a block with no lines"
                )));
            };

            snippets.push(ContextSnippet {
                path: path.clone(),
                start_line: first.line,
                end_line: last.line,
                lines: block.lines.iter().map(|line| line.line_text.clone()).collect(),
            });
        }
    }

    Ok(snippets)
}

/// Rewrites an absolute service path relative to `repo_root` so rendered
/// context is repo-agnostic. Paths outside the root (or already relative)
/// pass through unchanged.
pub(crate) fn relative_to_repo(path: &str, repo_root: &Path) -> String {
    let candidate = Path::new(path);
    if !candidate.is_absolute() {
        return path.to_string();
    }

    match candidate.strip_prefix(repo_root) {
        Ok(relative) => relative.display().to_string(),
        Err(_) => path.to_string(),
    }
}

/// Renders snippets into the context block interpolated into the augmented
/// prompt: one stanza per block, in the order received.
#[must_use]
pub fn render_context(snippets: &[ContextSnippet]) -> String {
    let mut rendered = Vec::new();

    for snippet in snippets {
        rendered.push(format!("File: {}", snippet.path));
        rendered.push(format!("Lines: {}-{}", snippet.start_line, snippet.end_line));
        rendered.push(String::new());
        rendered.push("```".to_string());
        for line in &snippet.lines {
            rendered.push(line.clone());
        }
        rendered.push("```".to_string());
    }

    rendered.join("\n")
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{
        relative_to_repo, render_context, snippets_from_response, ContextSnippet, QueryResponse,
    };
    use crate::error::SearchError;

    fn sample_response() -> QueryResponse {
        serde_json::from_str(
            r#"{
                "results": [
                    {
                        "path": "/home/dev/project/foo.py",
                        "blocks": [
                            {"lines": [
                                {"line": 10, "lineText": "def foo():"},
                                {"line": 11, "lineText": "    return 1"}
                            ]},
                            {"lines": [
                                {"line": 20, "lineText": "foo()"}
                            ]}
                        ]
                    },
                    {
                        "path": "bar.py",
                        "blocks": [
                            {"lines": [{"line": 3, "lineText": "import foo"}]}
                        ]
                    }
                ]
            }"#,
        )
        .expect("sample response should deserialize")
    }

    #[test]
    fn snippets_preserve_retrieval_order_and_line_ranges() {
        let snippets = snippets_from_response(sample_response(), Path::new("/home/dev/project"))
            .expect("sample response should flatten");

        assert_eq!(snippets.len(), 3);
        assert_eq!(snippets[0].path, "foo.py");
        assert_eq!(snippets[0].start_line, 10);
        assert_eq!(snippets[0].end_line, 11);
        assert_eq!(snippets[1].path, "foo.py");
        assert_eq!(snippets[1].start_line, 20);
        assert_eq!(snippets[1].end_line, 20);
        assert_eq!(snippets[2].path, "bar.py");
    }

    #[test]
    fn empty_block_is_rejected_as_malformed() {
        let response: QueryResponse = serde_json::from_str(
            r#"{"results": [{"path": "foo.py", "blocks": [{"lines": []}]}]}"#,
        )
        .expect("response should deserialize");

        let error = snippets_from_response(response, Path::new("/repo"))
            .expect_err("block with no lines must fail");
        assert!(matches!(error, SearchError::Malformed(_)));
    }

    #[test]
    fn absolute_paths_outside_repo_root_pass_through() {
        assert_eq!(
            relative_to_repo("/somewhere/else/foo.py", Path::new("/home/dev/project")),
            "/somewhere/else/foo.py"
        );
    }

    #[test]
    fn relative_paths_pass_through() {
        assert_eq!(
            relative_to_repo("src/lib.rs", Path::new("/home/dev/project")),
            "src/lib.rs"
        );
    }

    #[test]
    fn render_context_emits_one_stanza_per_block() {
        let snippets = vec![
            ContextSnippet {
                path: "foo.py".to_string(),
                start_line: 10,
                end_line: 11,
                lines: vec!["def foo():".to_string(), "    return 1".to_string()],
            },
            ContextSnippet {
                path: "bar.py".to_string(),
                start_line: 3,
                end_line: 3,
                lines: vec!["import foo".to_string()],
            },
        ];

        let rendered = render_context(&snippets);
        assert_eq!(
            rendered,
            "File: foo.py\nLines: 10-11\n\n```\ndef foo():\n    return 1\n```\nFile: bar.py\nLines: 3-3\n\n```\nimport foo\n```"
        );
    }

    #[test]
    fn render_context_of_no_snippets_is_empty() {
        assert_eq!(render_context(&[]), "");
    }
}
