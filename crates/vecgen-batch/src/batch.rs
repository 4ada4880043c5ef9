//! The batch orchestrator.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use vecgen_codegen::{
    package_segment, ComposeEmitter, EmitOptions, GeneratedFile, GroupContext, NameAllocator,
    SourceEmitter, SwiftUiEmitter,
};
use vecgen_core::{Icon, Result, VecgenError, Vector};
use vecgen_parser::IconParser;

use crate::context::RunContext;
use crate::normalize::{SvgNormalizer, UsvgNormalizer};
use crate::options::{GenerateOptions, OutputBackend, VectorType};
use crate::report::{BatchReport, GeneratedArtifact, GeneratedGroup};

/// Deepest directory level visited below the root.
pub const MAX_DEPTH: usize = 10;

/// What a run reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchInput {
    /// Walk a directory tree, one group per directory.
    Directory(PathBuf),
    /// A flat list of files, all in the root group.
    Files(Vec<PathBuf>),
}

/// Drives parsing and code generation over many files.
///
/// Files are processed one at a time; a failing file is recorded in the
/// report and never stops the run.
pub struct Batch {
    options: GenerateOptions,
    output_dir: Option<PathBuf>,
    normalizer: Box<dyn SvgNormalizer>,
}

impl Batch {
    pub fn new(options: GenerateOptions) -> Self {
        Self {
            options,
            output_dir: None,
            normalizer: Box::new(UsvgNormalizer::new()),
        }
    }

    /// Write generated files under `dir` instead of only returning them.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_normalizer(mut self, normalizer: impl SvgNormalizer + 'static) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Run the batch.
    ///
    /// Only an unusable top-level input or configuration is an error; every
    /// per-file problem ends up in [`BatchReport::failures`].
    pub fn run(&self, input: BatchInput) -> Result<BatchReport> {
        self.options.validate()?;
        if let BatchInput::Directory(root) = &input {
            if !root.is_dir() {
                return Err(VecgenError::InvalidInput {
                    path: root.clone(),
                    reason: "not a directory".to_string(),
                });
            }
        }

        let context = RunContext::new(&self.options)?;
        let emitter = emitter_for(self.options.backend);
        let mut run = Run {
            options: &self.options,
            emit_options: self.options.emit_options(),
            context: &context,
            emitter: emitter.as_ref(),
            normalizer: self.normalizer.as_ref(),
            report: BatchReport::default(),
        };

        let root = GroupContext::root(
            self.options.package.clone(),
            self.options.accessor_name.clone(),
        );
        let group = match &input {
            BatchInput::Directory(dir) => {
                log::info!(
                    "generating {} sources from directory {}",
                    emitter.backend_name(),
                    dir.display()
                );
                run.directory(dir, root, 0)
            }
            BatchInput::Files(files) => {
                log::info!(
                    "generating {} sources from {} files",
                    emitter.backend_name(),
                    files.len()
                );
                run.files(files, root)
            }
        };

        if let Some(out) = &self.output_dir {
            run.write(out, &group);
        }
        run.report.root_group = Some(group);

        let report = run.report;
        log::info!(
            "{} generated, {} failed",
            report.artifacts.len(),
            report.failures.len()
        );
        Ok(report)
    }
}

fn emitter_for(backend: OutputBackend) -> Box<dyn SourceEmitter> {
    match backend {
        OutputBackend::DeclarativeUi => Box::new(ComposeEmitter::new()),
        OutputBackend::NativeShape => Box::new(SwiftUiEmitter::new()),
    }
}

/// Allocator for the members of a group. A member never takes the name of
/// the group declaring it.
fn member_names(context: &GroupContext) -> NameAllocator {
    let mut names = NameAllocator::new();
    names.allocate(context.name());
    names
}

/// Mutable state of one run.
struct Run<'a> {
    options: &'a GenerateOptions,
    emit_options: EmitOptions,
    context: &'a RunContext,
    emitter: &'a dyn SourceEmitter,
    normalizer: &'a dyn SvgNormalizer,
    report: BatchReport,
}

impl Run<'_> {
    fn directory(&mut self, dir: &Path, context: GroupContext, depth: usize) -> GeneratedGroup {
        let mut group = GeneratedGroup::new(context);

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                self.fail(VecgenError::io(dir, e));
                return group;
            }
        };

        let mut files = Vec::new();
        let mut dirs = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    self.fail(VecgenError::io(dir, e));
                    continue;
                }
            };
            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            let path = entry.path();
            if path.is_dir() {
                dirs.push(path);
            } else {
                files.push(path);
            }
        }
        files.sort();
        dirs.sort();

        // Icons and child groups land in the same package.
        let mut names = member_names(&group.context);
        for file in &files {
            self.icon(file, &mut group, &mut names);
        }

        // Child packages and directories are lowercased, so distinct
        // identifiers can still share one.
        let mut segments = HashSet::new();
        for sub in &dirs {
            if depth + 1 > MAX_DEPTH {
                log::warn!(
                    "skipping {}: deeper than {} levels",
                    sub.display(),
                    MAX_DEPTH
                );
                continue;
            }
            let raw = sub
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let identifier = self.emitter.identifier(&raw);
            let name = loop {
                let name = names.allocate(&identifier);
                if segments.insert(package_segment(&name)) {
                    break name;
                }
            };
            let child = self.directory(sub, group.context.child(name), depth + 1);
            if child.is_empty() {
                log::debug!("no icons under {}", sub.display());
            } else {
                group.children.push(child);
            }
        }

        group
    }

    fn files(&mut self, files: &[PathBuf], context: GroupContext) -> GeneratedGroup {
        let mut group = GeneratedGroup::new(context);
        let mut names = member_names(&group.context);

        let unique: IndexSet<&PathBuf> = files.iter().collect();
        if unique.len() < files.len() {
            log::debug!("ignoring {} duplicate inputs", files.len() - unique.len());
        }
        for file in unique {
            self.icon(file, &mut group, &mut names);
        }
        group
    }

    /// Parse and emit one file into `group`.
    fn icon(&mut self, file: &Path, group: &mut GeneratedGroup, names: &mut NameAllocator) {
        let vector_type = self.options.vector_type;
        if !vector_type.matches(file) {
            let extension = file
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.fail(VecgenError::InputFormat {
                path: file.to_path_buf(),
                extension,
            });
            return;
        }

        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let identifier = self.emitter.identifier(&file_name);

        let vector = match self.load(file, &identifier, &file_name) {
            Ok(vector) => vector,
            Err(e) => {
                self.fail(e);
                return;
            }
        };

        let symbol = names.allocate(&identifier);
        let generated = self
            .emitter
            .emit_icon(&vector, &symbol, &group.context, &self.emit_options)
            .map_err(|e| VecgenError::Emit {
                path: file.to_path_buf(),
                message: e.to_string(),
            });
        let generated = match generated {
            Ok(generated) => generated,
            Err(e) => {
                self.fail(e);
                return;
            }
        };

        log::debug!("{} -> {}", file.display(), symbol);
        self.report.artifacts.push(GeneratedArtifact {
            name: symbol.clone(),
            group: group.qualified_name(),
            source_text: generated.content,
            file_path: generated.path,
            preview_image_file: (vector_type == VectorType::Svg).then(|| file.to_path_buf()),
        });
        group.icons.insert(file.to_path_buf(), symbol);
    }

    /// Read a file into the IR, normalizing SVG first.
    fn load(&self, file: &Path, identifier: &str, file_name: &str) -> Result<Vector> {
        let drawable = match self.options.vector_type {
            VectorType::Svg => self.normalizer.normalize(file, self.context.temp_dir())?,
            VectorType::DrawableXml => file.to_path_buf(),
        };
        let xml = std::fs::read_to_string(&drawable).map_err(|e| VecgenError::io(&drawable, e))?;

        let icon = Icon::new(identifier, file_name, xml);
        IconParser::new(&icon)
            .with_colors(self.context.colors())
            .parse()
            .map_err(|e| VecgenError::from_drawable(file, e))
    }

    /// Write every artifact and one accessor file per group under `out`.
    fn write(&mut self, out: &Path, root: &GeneratedGroup) {
        let mut files: Vec<GeneratedFile> = self
            .report
            .artifacts
            .iter()
            .map(|a| GeneratedFile {
                path: a.file_path.clone(),
                content: a.source_text.clone(),
            })
            .collect();

        let mut summaries = Vec::new();
        root.walk(&mut |group| summaries.push(group.summary()));
        for summary in &summaries {
            match self.emitter.emit_group(summary, &self.emit_options) {
                Ok(file) => files.push(file),
                Err(e) => self.fail(VecgenError::Emit {
                    path: summary.context.directory(),
                    message: e.to_string(),
                }),
            }
        }

        for file in files {
            let target = out.join(&file.path);
            match write_file(&target, &file.content) {
                Ok(()) => self.report.written.push(target),
                Err(e) => self.fail(e),
            }
        }
    }

    fn fail(&mut self, error: VecgenError) {
        match &error {
            VecgenError::InputFormat { .. } => log::warn!("skipped: {error}"),
            _ => log::error!("{error}"),
        }
        self.report.failures.push(error);
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| VecgenError::io(parent, e))?;
    }
    std::fs::write(path, content).map_err(|e| VecgenError::io(path, e))
}

/// Generate sources for a directory tree without writing them.
pub fn parse_directory(
    root: impl Into<PathBuf>,
    accessor: &str,
    options: GenerateOptions,
) -> Result<BatchReport> {
    Batch::new(options.with_accessor(accessor)).run(BatchInput::Directory(root.into()))
}

/// Generate sources for a list of files without writing them.
pub fn parse_files(
    files: Vec<PathBuf>,
    accessor: &str,
    options: GenerateOptions,
) -> Result<BatchReport> {
    Batch::new(options.with_accessor(accessor)).run(BatchInput::Files(files))
}

/// Generate sources for a directory tree and write them under `output`.
pub fn write_directory(
    root: impl Into<PathBuf>,
    accessor: &str,
    output: impl Into<PathBuf>,
    options: GenerateOptions,
) -> Result<BatchReport> {
    Batch::new(options.with_accessor(accessor))
        .with_output_dir(output)
        .run(BatchInput::Directory(root.into()))
}

/// Generate sources for a list of files and write them under `output`.
pub fn write_files(
    files: Vec<PathBuf>,
    accessor: &str,
    output: impl Into<PathBuf>,
    options: GenerateOptions,
) -> Result<BatchReport> {
    Batch::new(options.with_accessor(accessor))
        .with_output_dir(output)
        .run(BatchInput::Files(files))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use vecgen_core::ErrorKind;

    const SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24"><path d="M19 13h-6v6h-2v-6H5v-2h6V5h2v6h6v2z"/></svg>"#;

    const DRAWABLE: &str = r##"<vector xmlns:android="http://schemas.android.com/apk/res/android"
        android:width="24dp" android:height="24dp"
        android:viewportWidth="24" android:viewportHeight="24">
        <path android:fillColor="#FF000000" android:pathData="M19,13h-6v6h-2v-6H5v-2h6V5h2v6h6v2z"/>
    </vector>"##;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn xml_options() -> GenerateOptions {
        GenerateOptions::default().with_vector_type(VectorType::DrawableXml)
    }

    #[test]
    fn test_nested_groups() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("a.svg"), SVG);
        write(&dir.path().join("sub/b.svg"), SVG);

        let report = parse_directory(dir.path(), "Icons", GenerateOptions::default()).unwrap();

        assert!(report.is_clean(), "{:?}", report.failures);
        assert_eq!(report.artifacts.len(), 2);
        assert_eq!(report.artifact("A").unwrap().group, "Icons");
        assert_eq!(report.artifact("B").unwrap().group, "Icons.sub");
        assert_eq!(
            report.artifact("B").unwrap().file_path,
            PathBuf::from("com/example/icons/icons/sub/B.kt")
        );
        assert_eq!(
            report.artifact("A").unwrap().preview_image_file,
            Some(dir.path().join("a.svg"))
        );

        let root = report.root_group.unwrap();
        assert_eq!(root.qualified_name(), "Icons");
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].qualified_name(), "Icons.sub");
        assert_eq!(root.symbol_for(&dir.path().join("sub/b.svg")), Some("B"));
    }

    #[test]
    fn test_malformed_file_does_not_stop_batch() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("empty.xml"), "");
        write(&dir.path().join("one.xml"), DRAWABLE);
        write(&dir.path().join("two.xml"), DRAWABLE);

        let report = parse_directory(dir.path(), "Icons", xml_options()).unwrap();

        assert_eq!(report.artifacts.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].kind(), ErrorKind::MalformedVector);
        assert_eq!(
            report.failures[0].path(),
            Some(dir.path().join("empty.xml").as_path())
        );
    }

    #[test]
    fn test_non_xml_svg_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("junk.svg"), "not a vector");
        write(&dir.path().join("one.svg"), SVG);
        write(&dir.path().join("two.svg"), SVG);

        let report = parse_directory(dir.path(), "Icons", GenerateOptions::default()).unwrap();

        assert_eq!(report.artifacts.len(), 2);
        assert_eq!(
            report.failures_of(ErrorKind::MalformedVector).count(),
            1
        );
    }

    #[test]
    fn test_depth_is_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let mut level = dir.path().to_path_buf();
        write(&level.join("root.xml"), DRAWABLE);
        for i in 1..=12 {
            level = level.join(format!("d{i}"));
            write(&level.join(format!("icon{i}.xml")), DRAWABLE);
        }

        let report = parse_directory(dir.path(), "Icons", xml_options()).unwrap();

        assert!(report.is_clean());
        assert_eq!(report.artifacts.len(), 1 + MAX_DEPTH);
        assert!(report.artifact("Icon10").is_some());
        assert!(report.artifact("Icon11").is_none());
    }

    #[test]
    fn test_colliding_names_get_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("add.xml"), DRAWABLE);
        write(&dir.path().join("Add.XML"), DRAWABLE);

        let report = parse_directory(dir.path(), "Icons", xml_options()).unwrap();

        let mut names: Vec<&str> = report.artifacts.iter().map(|a| a.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["Add", "Add2"]);
    }

    #[test]
    fn test_flat_list() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("x/ic_home.xml");
        let b = dir.path().join("y/ic_home.xml");
        let c = dir.path().join("notes.txt");
        write(&a, DRAWABLE);
        write(&b, DRAWABLE);
        write(&c, "hello");

        let files = vec![a.clone(), b, a, c];
        let report = parse_files(files, "MyIcons", xml_options()).unwrap();

        let names: Vec<&str> = report.artifacts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["IcHome", "IcHome2"]);
        assert!(report.artifacts.iter().all(|a| a.group == "MyIcons"));
        assert!(report.artifacts.iter().all(|a| a.preview_image_file.is_none()));
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].kind(), ErrorKind::InputFormat);
    }

    #[test]
    fn test_missing_file_in_list_is_filesystem_failure() {
        let report = parse_files(
            vec![PathBuf::from("/nonexistent/icon.xml")],
            "Icons",
            xml_options(),
        )
        .unwrap();

        assert!(report.artifacts.is_empty());
        assert_eq!(report.failures[0].kind(), ErrorKind::Filesystem);
    }

    #[test]
    fn test_invalid_root_is_fatal() {
        let err = parse_directory("/nonexistent/root", "Icons", GenerateOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Fatal);
    }

    #[test]
    fn test_gradient_order_survives_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir.path().join("fade.xml"),
            r##"<vector xmlns:android="http://schemas.android.com/apk/res/android"
                xmlns:aapt="http://schemas.android.com/aapt"
                android:width="24dp" android:height="24dp"
                android:viewportWidth="24" android:viewportHeight="24">
                <path android:pathData="M0,0h24v24h-24z">
                    <aapt:attr name="android:fillColor">
                        <gradient android:type="linear" android:startX="0" android:startY="0"
                            android:endX="24" android:endY="0">
                            <item android:offset="0" android:color="#FF0000"/>
                            <item android:offset="1" android:color="#0000FF"/>
                        </gradient>
                    </aapt:attr>
                </path>
            </vector>"##,
        );

        let report = parse_directory(dir.path(), "Icons", xml_options()).unwrap();
        let source = &report.artifact("Fade").unwrap().source_text;

        let red = source.find("Color(0xFFFF0000)").unwrap();
        let blue = source.find("Color(0xFF0000FF)").unwrap();
        assert!(red < blue);
    }

    #[test]
    fn test_write_directory() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write(&input.path().join("a.xml"), DRAWABLE);
        write(&input.path().join("sub/b.xml"), DRAWABLE);
        write(&input.path().join(".hidden/c.xml"), DRAWABLE);

        let report =
            write_directory(input.path(), "Icons", output.path(), xml_options()).unwrap();

        assert!(report.is_clean());
        assert_eq!(report.artifacts.len(), 2);
        let base = output.path().join("com/example/icons");
        assert!(base.join("icons/A.kt").is_file());
        assert!(base.join("icons/sub/B.kt").is_file());
        assert!(base.join("Icons.kt").is_file());
        assert!(base.join("icons/Sub.kt").is_file());
        assert_eq!(report.written.len(), 4);

        let root = fs::read_to_string(base.join("Icons.kt")).unwrap();
        assert!(root.contains("object Icons"));
    }

    #[test]
    fn test_swiftui_backend() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("star.xml"), DRAWABLE);

        let options = xml_options().with_backend(OutputBackend::NativeShape);
        let report = parse_directory(dir.path(), "Icons", options).unwrap();

        let artifact = report.artifact("Star").unwrap();
        assert!(artifact.source_text.contains("struct Star: Shape"));
        assert_eq!(artifact.file_path, PathBuf::from("icons/Star.swift"));
    }

    #[test]
    fn test_accessor_must_be_an_identifier() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("add.xml"), DRAWABLE);

        let err = parse_directory(dir.path(), "my-icons", xml_options()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Fatal);

        let err = parse_files(vec![dir.path().join("add.xml")], "my icons", xml_options())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Fatal);
    }

    #[test]
    fn test_sibling_groups_get_distinct_packages() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write(&input.path().join("sub_a/star.xml"), DRAWABLE);
        write(&input.path().join("suba/star.xml"), DRAWABLE);

        let report =
            write_directory(input.path(), "Icons", output.path(), xml_options()).unwrap();

        assert!(report.is_clean(), "{:?}", report.failures);
        assert_eq!(report.artifacts.len(), 2);
        let groups: Vec<&str> = report.artifacts.iter().map(|a| a.group.as_str()).collect();
        assert_eq!(groups, vec!["Icons.suba", "Icons.suba2"]);
        assert_ne!(report.artifacts[0].file_path, report.artifacts[1].file_path);

        let written: std::collections::HashSet<&PathBuf> = report.written.iter().collect();
        assert_eq!(written.len(), report.written.len());
        let base = output.path().join("com/example/icons/icons");
        assert!(base.join("suba/Star.kt").is_file());
        assert!(base.join("suba2/Star.kt").is_file());
    }

    #[test]
    fn test_icon_never_takes_its_group_name() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("icons.xml"), DRAWABLE);
        write(&dir.path().join("sub/sub.xml"), DRAWABLE);

        let options = xml_options().with_backend(OutputBackend::NativeShape);
        let report = parse_directory(dir.path(), "Icons", options).unwrap();

        assert!(report.is_clean(), "{:?}", report.failures);
        assert!(report.artifact("Icons").is_none());
        assert_eq!(report.artifact("Icons2").unwrap().group, "Icons");
        assert_eq!(report.artifact("Sub2").unwrap().group, "Icons.sub");

        let report = parse_files(vec![dir.path().join("icons.xml")], "Icons", xml_options())
            .unwrap();
        let names: Vec<&str> = report.artifacts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Icons2"]);
    }

    #[test]
    fn test_temp_files_are_cleaned_up() {
        use std::cell::RefCell;
        use std::rc::Rc;

        #[derive(Default, Clone)]
        struct Recording(Rc<RefCell<Vec<PathBuf>>>);

        impl SvgNormalizer for Recording {
            fn normalize(&self, svg: &Path, out_dir: &Path) -> Result<PathBuf> {
                let out = UsvgNormalizer::new().normalize(svg, out_dir)?;
                self.0.borrow_mut().push(out.clone());
                Ok(out)
            }
        }

        let recording = Recording::default();
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("a.svg"), SVG);

        let report = Batch::new(GenerateOptions::default())
            .with_normalizer(recording.clone())
            .run(BatchInput::Directory(dir.path().to_path_buf()))
            .unwrap();

        assert_eq!(report.artifacts.len(), 1);
        let normalized = recording.0.borrow();
        assert_eq!(normalized.len(), 1);
        assert!(!normalized[0].exists());
    }
}
