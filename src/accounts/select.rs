use std::io::{self, BufRead, Write};

pub mod skim;

/// Picks one value for `label` (e.g. "Account") when the caller did not pass it.
pub trait SelectAlias {
    fn select_alias(&self, label: &str, candidates: &[&str]) -> anyhow::Result<Option<String>>;
}

/// Asks for a free-form value on stderr, so that stdout stays clean for `$(...)`.
pub struct PromptSelector;

impl SelectAlias for PromptSelector {
    fn select_alias(&self, label: &str, _candidates: &[&str]) -> anyhow::Result<Option<String>> {
        let value = prompt_line(label, io::stdin().lock(), io::stderr())?;
        Ok((!value.is_empty()).then_some(value))
    }
}

/// Fuzzy picker when there is something to pick from, free-form prompt otherwise.
pub struct InteractiveSelector;

impl SelectAlias for InteractiveSelector {
    fn select_alias(&self, label: &str, candidates: &[&str]) -> anyhow::Result<Option<String>> {
        if candidates.is_empty() {
            PromptSelector.select_alias(label, candidates)
        } else {
            skim::SkimSelector.select_alias(label, candidates)
        }
    }
}

pub fn prompt_line<R: BufRead, W: Write>(
    label: &str,
    mut input: R,
    mut output: W,
) -> io::Result<String> {
    write!(output, "{}: ", label)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_writes_label_and_trims_answer() {
        let mut out = Vec::new();
        let answer = prompt_line("Account", io::Cursor::new("sit \n"), &mut out).unwrap();
        assert_eq!(answer, "sit");
        assert_eq!(String::from_utf8(out).unwrap(), "Account: ");
    }

    #[test]
    fn prompt_on_closed_input_is_empty() {
        let answer = prompt_line("Role", io::Cursor::new(""), io::sink()).unwrap();
        assert_eq!(answer, "");
    }
}
