//! Results of a batch run.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use vecgen_codegen::{GroupContext, GroupSummary};
use vecgen_core::{ErrorKind, VecgenError};

/// One generated icon source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    /// Generated symbol name.
    pub name: String,
    /// Qualified group name, e.g. `Icons.sub`.
    pub group: String,
    pub source_text: String,
    /// Output path relative to the output directory.
    pub file_path: PathBuf,
    /// Image the UI can show next to the code; the source SVG for SVG inputs.
    pub preview_image_file: Option<PathBuf>,
}

/// A naming group mirroring one input directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedGroup {
    pub context: GroupContext,
    /// Source file to generated symbol, in generation order.
    pub icons: IndexMap<PathBuf, String>,
    pub children: Vec<GeneratedGroup>,
}

impl GeneratedGroup {
    pub fn new(context: GroupContext) -> Self {
        Self {
            context,
            icons: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.context.name()
    }

    pub fn qualified_name(&self) -> String {
        self.context.qualified_name()
    }

    /// Symbol generated for `source`, searching child groups too.
    pub fn symbol_for(&self, source: &Path) -> Option<&str> {
        self.icons
            .get(source)
            .map(String::as_str)
            .or_else(|| self.children.iter().find_map(|c| c.symbol_for(source)))
    }

    /// Number of icons in this group and all of its descendants.
    pub fn icon_count(&self) -> usize {
        self.icons.len() + self.children.iter().map(Self::icon_count).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.icon_count() == 0
    }

    /// Visit this group and its descendants, parents first.
    pub fn walk(&self, visit: &mut impl FnMut(&GeneratedGroup)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    pub(crate) fn summary(&self) -> GroupSummary {
        GroupSummary {
            context: self.context.clone(),
            icons: self.icons.values().cloned().collect(),
            children: self.children.iter().map(|c| c.name().to_string()).collect(),
        }
    }
}

/// Everything a run produced.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Successful icons, in processing order.
    pub artifacts: Vec<GeneratedArtifact>,
    /// Per-file failures; none of them stopped the run.
    pub failures: Vec<VecgenError>,
    pub root_group: Option<GeneratedGroup>,
    /// Files written in file-writing mode.
    pub written: Vec<PathBuf>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures_of(&self, kind: ErrorKind) -> impl Iterator<Item = &VecgenError> {
        self.failures.iter().filter(move |e| e.kind() == kind)
    }

    pub fn artifact(&self, name: &str) -> Option<&GeneratedArtifact> {
        self.artifacts.iter().find(|a| a.name == name)
    }
}
