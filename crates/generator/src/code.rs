//! Indentation-aware line writer

const INDENT: &str = "  ";

#[derive(Debug, Default, Clone)]
pub struct CodeWriter {
    lines: Vec<String>,
    depth: usize,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines.push(format!("{}{}", INDENT.repeat(self.depth), text));
        }
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Write `header {` and indent until the matching [`close_block`](Self::close_block)
    pub fn open_block(&mut self, header: impl AsRef<str>) {
        self.line(format!("{} {{", header.as_ref()));
        self.depth += 1;
    }

    pub fn close_block(&mut self) {
        self.close_block_with("}");
    }

    pub fn close_block_with(&mut self, closer: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(closer);
    }

    /// Write a `/** ... */` comment, one line per input line
    pub fn doc(&mut self, text: &str) {
        self.line("/**");
        for line in text.lines() {
            let line = line.replace("*/", "*\\/");
            if line.trim().is_empty() {
                self.line(" *");
            } else {
                self.line(format!(" * {}", line.trim_end()));
            }
        }
        self.line(" */");
    }

    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_indent() {
        let mut code = CodeWriter::new();
        code.open_block("export interface Foo");
        code.line("readonly bar?: string;");
        code.close_block();

        assert_eq!(
            code.render(),
            "export interface Foo {\n  readonly bar?: string;\n}\n"
        );
    }

    #[test]
    fn test_doc_escapes_terminator() {
        let mut code = CodeWriter::new();
        code.doc("first */ line\n\nsecond");

        assert_eq!(code.render(), "/**\n * first *\\/ line\n *\n * second\n */\n");
    }
}
