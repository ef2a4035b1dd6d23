// Copyright (c) 2026 Paperpress Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Paperpress Contributors

use std::sync::LazyLock;

use regex_lite::Regex;

use super::CompletionRequest;

pub const GENERATION_MAX_TOKENS: u32 = 8192;
pub const CHAT_MAX_TOKENS: u32 = 4096;

const PAPER_SYSTEM: &str = "You are an expert academic researcher and technical writer.";
const CODE_SYSTEM: &str =
    "You are an expert software engineer and AI researcher specializing in production-ready code.";
const CHAT_SYSTEM: &str = "You are a helpful AI assistant for research paper editing.";

static CODE_INTENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)code|python|implementation|experiment|script|function|class").unwrap());

pub fn paper_prompt(title: &str, description: &str) -> String {
    format!(
        r#"You are an expert academic researcher writing for NeurIPS. Generate a comprehensive, technically rigorous research paper in LaTeX format.

TITLE: {title}
FOCUS: {description}

LaTeX FORMAT RULES:
1. No preamble: do NOT emit \documentclass, \usepackage, \begin{{document}}, \end{{document}} or \maketitle.
2. Start directly with the paper content.
3. Use only basic LaTeX commands that work without extra packages.

PAPER HEADER (keep this shape):
\begin{{center}}
\textbf{{\Large {title}}}

\vspace{{0.3cm}}

\textbf{{First Author}}$^{{1,*}}$, \textbf{{Second Author}}$^{{1}}$, \textbf{{Third Author}}$^{{2}}$

\vspace{{0.2cm}}

$^{{1}}$First Affiliation

$^{{2}}$Second Affiliation

\vspace{{0.2cm}}

$^{{*}}$Corresponding author
\end{{center}}

\vspace{{0.4cm}}

REQUIRED SECTIONS, in order:
\subsection*{{Abstract}} of 150 to 200 words, followed by \textbf{{Keywords:}} and 5 to 7 keywords.
\section{{Introduction}} with motivation, limitations of existing work, an itemized list of contributions and the paper organization.
\section{{Background and Related Work}} with two or three subsections.
\section{{Methodology}} with problem formulation, the proposed method with its key equations, and theoretical analysis.
\section{{Experimental Setup}} with datasets, baselines and metrics, and implementation details.
\section{{Results and Analysis}} with main results in a tabular, ablations and qualitative analysis.
\section{{Discussion}}
\section{{Conclusion}}
\section*{{References}} with 15 to 20 references formatted as [1] Author, A. (2024). Title. In \textit{{Venue}}.

MATHEMATICS:
- $...$ for inline math and $$...$$ for display equations.
- Number important equations as $$equation \quad (1)$$.
- Include 8 to 12 meaningful equations.

STYLE:
- 3000 to 4000 words, technically precise, with specific numbers.
- \textbf{{}} for bold, \textit{{}} for italics, itemize or enumerate for lists, verbatim for code.
- Citations as [1], [2].

Generate a complete paper ready for submission."#
    )
}

/// The experiment-code prompt. `latex_body` is the freshly written paper, so
/// the code follows the method it describes.
pub fn code_prompt(title: &str, description: &str, latex_body: &str) -> String {
    format!(
        r#"You are an expert AI researcher and software engineer. Generate complete, runnable Python code that implements and runs the experiment described in this research paper.

PAPER TITLE: {title}
DESCRIPTION: {description}

PAPER (LaTeX):
{latex_body}

REQUIREMENTS:
- A single runnable Python script, not a notebook.
- PyTorch for the models; numpy, matplotlib and scikit-learn as needed.
- The full model architecture, a training loop, evaluation functions and metrics.
- Data loading with synthetic data or a standard dataset.
- Hyperparameter configuration, progress reporting during training and result plots.
- Docstrings and comments, with proper error handling.
- A main() function and an `if __name__ == "__main__":` block.

Respond with Python code only: start with the imports and do not wrap the code in markdown."#
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    EditCode,
    EditPaper,
    Question,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatPrompt {
    pub intent: Intent,
    pub text: String,
}

/// Decide what a chat message is about and build the prompt for it.
///
/// A message that mentions code edits the experiment when there is one;
/// otherwise it edits the paper when there is one; otherwise it is sent as is.
pub fn chat_prompt(message: &str, latex: &str, python: &str) -> ChatPrompt {
    let has_code = !python.trim().is_empty();
    let has_paper = !latex.trim().is_empty();

    if CODE_INTENT.is_match(message) && has_code {
        let text = format!(
            r#"You are an AI agent helping to edit Python experiment code. The user wants to: "{message}".

Here is the current Python code:
{python}

Respond ONLY with the complete modified Python code, without explanations or markdown blocks.
Make sure the code is runnable and properly formatted."#
        );
        return ChatPrompt {
            intent: Intent::EditCode,
            text,
        };
    }

    if has_paper {
        let text = format!(
            r#"You are an AI agent helping to edit a research paper. The user wants to: "{message}".

Here is the current LaTeX source:
{latex}

If the user wants to modify the paper, respond ONLY with the complete modified LaTeX code, without explanations or markdown blocks.
If the user asks a question, provide a helpful answer.

Formatting rules:
- \section{{}} for numbered sections, \section*{{}} for unnumbered ones; likewise \subsection.
- \begin{{center}}...\end{{center}} for the centered header, \Large for the title size.
- \vspace{{0.Xcm}} for spacing, \textbf{{}} and \textit{{}} for emphasis.
- $math$ for inline math and $$display math$$ for equations.
- No \documentclass, \usepackage, \begin{{document}} or \maketitle."#
        );
        return ChatPrompt {
            intent: Intent::EditPaper,
            text,
        };
    }

    ChatPrompt {
        intent: Intent::Question,
        text: message.to_string(),
    }
}

pub fn paper_request(title: &str, description: &str) -> CompletionRequest {
    CompletionRequest {
        system: PAPER_SYSTEM.to_string(),
        prompt: paper_prompt(title, description),
        max_tokens: GENERATION_MAX_TOKENS,
    }
}

pub fn code_request(title: &str, description: &str, latex_body: &str) -> CompletionRequest {
    CompletionRequest {
        system: CODE_SYSTEM.to_string(),
        prompt: code_prompt(title, description, latex_body),
        max_tokens: GENERATION_MAX_TOKENS,
    }
}

impl ChatPrompt {
    pub fn request(&self) -> CompletionRequest {
        CompletionRequest {
            system: CHAT_SYSTEM.to_string(),
            prompt: self.text.clone(),
            max_tokens: CHAT_MAX_TOKENS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paper_prompt() {
        let prompt = paper_prompt("Sparse Attention", "long context");
        assert!(prompt.contains("TITLE: Sparse Attention"));
        assert!(prompt.contains(r"\textbf{\Large Sparse Attention}"));
        assert!(prompt.contains(r"\begin{center}"));
        assert!(prompt.contains(r"$^{1,*}$"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_code_prompt_includes_paper() {
        let request = code_request("Sparse Attention", "long context", "\\section{Method}\nWe prune heads.");
        assert!(request.prompt.contains("PAPER TITLE: Sparse Attention"));
        assert!(request.prompt.contains("PAPER (LaTeX):\n\\section{Method}\nWe prune heads."));
        assert_eq!(request.max_tokens, GENERATION_MAX_TOKENS);
    }

    #[test]
    fn test_intent() {
        let latex = r"\section{Intro}";
        let python = "import torch";
        assert_eq!(chat_prompt("Refactor the training Script", latex, python).intent, Intent::EditCode);
        assert_eq!(chat_prompt("add a python class", latex, "").intent, Intent::EditPaper);
        assert_eq!(chat_prompt("shorten the abstract", latex, python).intent, Intent::EditPaper);

        let question = chat_prompt("what is attention?", "", "");
        assert_eq!(question.intent, Intent::Question);
        assert_eq!(question.text, "what is attention?");
    }

    #[test]
    fn test_edit_prompt_embeds_source() {
        let prompt = chat_prompt("fix the function", "", "def f():\n    pass");
        assert!(prompt.text.contains("The user wants to: \"fix the function\"."));
        assert!(prompt.text.contains("def f():\n    pass"));
        assert_eq!(prompt.request().max_tokens, CHAT_MAX_TOKENS);
    }
}
