use std::io;

use skim::prelude::{SkimItemReader, SkimOptionsBuilder};
use skim::Skim;

use crate::accounts::select::SelectAlias;

pub struct SkimSelector;

impl SelectAlias for SkimSelector {
    fn select_alias(&self, label: &str, candidates: &[&str]) -> anyhow::Result<Option<String>> {
        let mut names = candidates.to_vec();
        names.sort();

        let item_reader = SkimItemReader::default();
        let items = item_reader.of_bufread(io::Cursor::new(names.join("\n")));

        let prompt = format!("{}> ", label);
        let options = SkimOptionsBuilder::default()
            .reverse(true)
            .prompt(Some(prompt.as_str()))
            .build()?;
        let selected = Skim::run_with(&options, Some(items))
            .and_then(|out| (!out.is_abort).then_some(out.selected_items))
            .unwrap_or_default();

        Ok(selected.into_iter().next().map(|x| x.output().to_string()))
    }
}
