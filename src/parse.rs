//! Top-level parse entry points.
//!
//! `parse_source` compiles one file's `figma.connect` declarations into
//! documents; `parse_source_files` runs it over many files with rayon, after
//! loading every file's top-level symbols into a shared read-only
//! `ProjectContext` so component references can resolve across files.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;
use rayon::prelude::*;

use crate::config::ProjectConfig;
use crate::declaration::{for_each_connect_call, DeclarationParser};
use crate::document::{CodeConnectDocument, SourceLocation, TemplateData};
use crate::error::{line_col, ParseWarning, ParserError};
use crate::template::TemplateCompiler;

pub(crate) fn tsx_source_type() -> SourceType {
    SourceType::default()
        .with_module(true)
        .with_typescript(true)
        .with_jsx(true)
}

/// Top-level symbols of one loaded file: declared name to 1-based line.
/// Default exports are keyed as `default`.
#[derive(Debug, Default, Clone)]
pub struct FileSymbols {
    pub declarations: HashMap<String, u32>,
}

/// Read-only cross-file symbol table shared by all parses. Built once by
/// the driver; the core never writes to it while parsing.
#[derive(Debug, Default)]
pub struct ProjectContext {
    files: HashMap<PathBuf, FileSymbols>,
}

impl ProjectContext {
    pub fn new() -> Self {
        ProjectContext::default()
    }

    /// Parse a file and record its top-level declaration lines. Files that
    /// fail to parse contribute no symbols; importers of them degrade.
    pub fn load_file(&mut self, path: impl Into<PathBuf>, source: &str) {
        let path = path.into();
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, tsx_source_type()).parse();
        if !ret.errors.is_empty() {
            self.files.insert(path, FileSymbols::default());
            return;
        }

        use oxc_ast::ast::*;
        let mut symbols = FileSymbols::default();
        let mut record = |name: &str, offset: u32| {
            symbols
                .declarations
                .entry(name.to_string())
                .or_insert_with(|| line_col(source, offset).0);
        };
        for stmt in &ret.program.body {
            match stmt {
                Statement::FunctionDeclaration(func) => {
                    if let Some(id) = &func.id {
                        record(id.name.as_str(), func.span.start);
                    }
                }
                Statement::ClassDeclaration(class) => {
                    if let Some(id) = &class.id {
                        record(id.name.as_str(), class.span.start);
                    }
                }
                Statement::VariableDeclaration(var) => {
                    for decl in &var.declarations {
                        if let BindingPattern::BindingIdentifier(id) = &decl.id {
                            record(id.name.as_str(), var.span.start);
                        }
                    }
                }
                Statement::ExportNamedDeclaration(export) => match &export.declaration {
                    Some(Declaration::FunctionDeclaration(func)) => {
                        if let Some(id) = &func.id {
                            record(id.name.as_str(), export.span.start);
                        }
                    }
                    Some(Declaration::ClassDeclaration(class)) => {
                        if let Some(id) = &class.id {
                            record(id.name.as_str(), export.span.start);
                        }
                    }
                    Some(Declaration::VariableDeclaration(var)) => {
                        for decl in &var.declarations {
                            if let BindingPattern::BindingIdentifier(id) = &decl.id {
                                record(id.name.as_str(), export.span.start);
                            }
                        }
                    }
                    _ => {}
                },
                Statement::ExportDefaultDeclaration(export) => {
                    record("default", export.span.start);
                }
                _ => {}
            }
        }
        self.files.insert(path, symbols);
    }

    /// Resolve a relative import to a loaded file and the line of the
    /// imported symbol. `imported` is `default` for default imports and `*`
    /// for namespace imports.
    pub fn resolve_import(
        &self,
        importing_file: &str,
        specifier: &str,
        imported: &str,
    ) -> Option<(String, u32)> {
        if !specifier.starts_with("./") && !specifier.starts_with("../") {
            return None;
        }
        let base = Path::new(importing_file).parent().unwrap_or(Path::new(""));
        let joined = normalize(&base.join(specifier));

        let mut candidates: Vec<PathBuf> = vec![joined.clone()];
        for ext in ["tsx", "ts", "jsx", "js"] {
            let mut with_ext = joined.clone().into_os_string();
            with_ext.push(format!(".{}", ext));
            candidates.push(PathBuf::from(with_ext));
            candidates.push(joined.join(format!("index.{}", ext)));
        }

        for candidate in candidates {
            if let Some(symbols) = self.files.get(&candidate) {
                let file = candidate.to_string_lossy().into_owned();
                if imported == "*" {
                    return Some((file, 1));
                }
                let line = symbols.declarations.get(imported).copied().unwrap_or(1);
                return Some((file, line));
            }
        }
        None
    }
}

/// Lexically remove `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[derive(Debug, Default)]
pub struct ParseOutcome {
    pub documents: Vec<CodeConnectDocument>,
    pub warnings: Vec<ParseWarning>,
}

/// Result of parsing one file in the multi-file driver.
#[derive(Debug)]
pub struct FileResult {
    pub file: String,
    pub outcome: Result<ParseOutcome, ParserError>,
}

/// Parse one file's declarations into documents. The first failing
/// declaration aborts the file; skip-and-continue policy belongs to the
/// caller.
pub fn parse_source(
    source: &str,
    file_path: &str,
    config: &ProjectConfig,
    context: &ProjectContext,
) -> Result<ParseOutcome, ParserError> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, tsx_source_type()).parse();
    if !ret.errors.is_empty() {
        return Err(ParserError::parse(
            format!("Could not parse file: {}", ret.errors[0]),
            file_path,
        ));
    }
    let program = &ret.program;

    let declaration_parser = DeclarationParser::new(source, file_path, config);
    let mut outcome = ParseOutcome::default();
    let mut failure: Option<ParserError> = None;

    for_each_connect_call(program, |call| {
        if failure.is_some() {
            return;
        }
        let result = (|| -> Result<(), ParserError> {
            let declaration = declaration_parser.parse_declaration(call, program)?;

            let (source_file, source_line) = match &declaration.component {
                Some(component) => {
                    let resolution =
                        declaration_parser.resolve_component(component, program, context);
                    if let Some(warning) = resolution.warning {
                        outcome.warnings.push(warning);
                    }
                    (resolution.source, resolution.line)
                }
                None => (String::new(), 0),
            };

            let compiler = TemplateCompiler::new(
                source,
                file_path,
                config,
                declaration.props.as_ref(),
                declaration.imports.as_deref(),
            );
            let compiled = match declaration.example {
                Some(example) => compiler.compile_example(example, program)?,
                None => {
                    // parse_declaration guarantees a component here.
                    let component = declaration
                        .component
                        .as_ref()
                        .ok_or_else(|| {
                            ParserError::internal_at(
                                "declaration without component or example survived validation",
                                file_path,
                                source,
                                declaration.span.start,
                            )
                        })?;
                    compiler.compile_default(&component.name, program)
                }
            };

            outcome.documents.push(CodeConnectDocument {
                figma_node_url: declaration.figma_node_url,
                component: declaration.component.map(|c| c.name),
                variant: declaration.variant,
                template: compiled.template,
                template_data: TemplateData {
                    props: declaration.props,
                    imports: if compiled.imports.is_empty() {
                        None
                    } else {
                        Some(compiled.imports)
                    },
                    nestable: Some(compiled.nestable),
                },
                language: CodeConnectDocument::LANGUAGE.to_string(),
                label: config.label().to_string(),
                links: declaration.links,
                source: source_file,
                source_location: SourceLocation { line: source_line },
            });
            Ok(())
        })();
        if let Err(err) = result {
            failure = Some(err);
        }
    });

    match failure {
        Some(err) => Err(err),
        None => Ok(outcome),
    }
}

/// Parse many files in parallel. Every file is loaded into the shared
/// context first so imports between them resolve; each file's parse is then
/// independent.
pub fn parse_source_files(paths: &[PathBuf], config: &ProjectConfig) -> Vec<FileResult> {
    let sources: Vec<(PathBuf, Result<String, std::io::Error>)> = paths
        .iter()
        .map(|path| (path.clone(), std::fs::read_to_string(path)))
        .collect();

    let mut context = ProjectContext::new();
    for (path, source) in &sources {
        if let Ok(source) = source {
            context.load_file(normalize(path), source);
        }
    }

    sources
        .par_iter()
        .map(|(path, source)| {
            let file = path.to_string_lossy().into_owned();
            let outcome = match source {
                Ok(source) => parse_source(source, &file, config, &context),
                Err(io_err) => Err(ParserError::parse(
                    format!("Could not read file: {}", io_err),
                    &file,
                )),
            };
            FileResult { file, outcome }
        })
        .collect()
}
