use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use css_sprite_core::SpriteConfig;
use globset::GlobBuilder;
use tracing::debug;
use walkdir::WalkDir;

const GLOB_META: &[char] = &['*', '?', '[', '{'];

/// Resolve the configured input source into an ordered list of image paths.
///
/// A list file wins over a glob, which wins over explicit paths. List-file and
/// explicit order is kept; glob matches are sorted.
pub fn resolve_inputs(cfg: &SpriteConfig) -> anyhow::Result<Vec<PathBuf>> {
    if let Some(list) = &cfg.filelist {
        let list = expand_user_path(&list.to_string_lossy());
        return read_filelist(&list);
    }
    if let Some(pattern) = &cfg.glob {
        return expand_glob(pattern);
    }
    Ok(cfg.files.clone())
}

/// Read a newline-delimited list of images.
///
/// Relative entries are resolved against the list file's own directory.
pub fn read_filelist(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read filelist {}", path.display()))?;
    let absolute = std::path::absolute(path)
        .with_context(|| format!("resolve filelist {}", path.display()))?;
    let base = absolute.parent().unwrap_or(Path::new(""));
    Ok(parse_filelist(&contents, base))
}

pub fn parse_filelist(contents: &str, base: &Path) -> Vec<PathBuf> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| base.join(line))
        .collect()
}

/// Expand a shell-style pattern (`icons/*.png`, `art/**/*.png`) into sorted file paths.
///
/// `*` and `?` do not cross `/`; `**` does. Symlinks are followed. A hidden
/// file or directory is only entered when the pattern component it is matched
/// against itself starts with a dot.
pub fn expand_glob(pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    let pattern = normalize_separators(pattern);
    let split = GlobSplit::new(&pattern);
    let Some(depth) = split.depth else {
        // no wildcards: the pattern names a single file
        let p = PathBuf::from(&pattern);
        return Ok(if p.is_file() { vec![p] } else { Vec::new() });
    };

    let matcher = GlobBuilder::new(&pattern)
        .literal_separator(true)
        .build()
        .with_context(|| format!("invalid glob pattern '{}'", pattern))?
        .compile_matcher();

    let root = split.root();
    let mut walker = WalkDir::new(&root).min_depth(1).follow_links(true);
    if let Some(depth) = depth {
        walker = walker.max_depth(depth);
    }
    let entries = walker.into_iter().filter_entry(|entry| {
        let hidden = entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.');
        !hidden || split.allows_hidden(entry.depth(), entry.file_type().is_dir())
    });
    let mut list: Vec<PathBuf> = Vec::new();
    for entry in entries.filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let full = normalize_separators(&entry.path().to_string_lossy());
        let candidate = if split.implicit_root {
            full.strip_prefix("./").unwrap_or(&full).to_string()
        } else {
            full
        };
        if matcher.is_match(&candidate) {
            list.push(PathBuf::from(candidate));
        }
    }
    list.sort_by(|a, b| a.to_string_lossy().cmp(&b.to_string_lossy()));
    debug!(pattern = %pattern, matches = list.len(), "glob expanded");
    Ok(list)
}

/// `\` is a path separator on Windows only; elsewhere it is a glob escape or
/// part of a file name.
fn normalize_separators(path: &str) -> String {
    if cfg!(windows) {
        path.replace('\\', "/")
    } else {
        path.to_string()
    }
}

/// Literal directory prefix of a glob and how deep the wildcard part reaches.
struct GlobSplit {
    literal: String,
    implicit_root: bool,
    /// `None` when the pattern has no wildcard; `Some(None)` for unbounded (`**`).
    depth: Option<Option<usize>>,
    /// Pattern components below the literal root.
    components: Vec<String>,
}

impl GlobSplit {
    fn new(pattern: &str) -> Self {
        let parts: Vec<&str> = pattern.split('/').collect();
        let Some(first_meta) = parts.iter().position(|p| p.contains(GLOB_META)) else {
            return Self {
                literal: pattern.to_string(),
                implicit_root: false,
                depth: None,
                components: Vec::new(),
            };
        };
        let rest = &parts[first_meta..];
        let depth = if rest.iter().any(|p| p.contains("**")) {
            None
        } else {
            Some(rest.len())
        };
        let literal = parts[..first_meta].join("/");
        let (literal, implicit_root) = if literal.is_empty() {
            if pattern.starts_with('/') {
                ("/".to_string(), false)
            } else {
                (".".to_string(), true)
            }
        } else {
            (literal, false)
        };
        Self {
            literal,
            implicit_root,
            depth: Some(depth),
            components: rest.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn root(&self) -> PathBuf {
        PathBuf::from(&self.literal)
    }

    /// Whether a dot-prefixed entry `depth` levels below the root may match.
    ///
    /// Under `**` the depth of a component is unknown, so directories need a
    /// dotted directory component and files a dotted last component.
    fn allows_hidden(&self, depth: usize, is_dir: bool) -> bool {
        let dotted = |c: &String| c.starts_with('.');
        match self.depth {
            Some(Some(_)) => depth
                .checked_sub(1)
                .and_then(|i| self.components.get(i))
                .is_some_and(dotted),
            _ if is_dir => self
                .components
                .split_last()
                .is_some_and(|(_, dirs)| dirs.iter().any(dotted)),
            _ => self.components.last().is_some_and(dotted),
        }
    }
}

/// Expand `$VAR`, `${VAR}` and a leading `~` in a user-supplied path.
///
/// Unknown variables are left as written.
pub fn expand_user_path(raw: &str) -> PathBuf {
    let expanded = expand_env_vars(raw);
    if expanded == "~" || expanded.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            let rest = expanded.trim_start_matches('~').trim_start_matches('/');
            return if rest.is_empty() { home } else { home.join(rest) };
        }
    }
    PathBuf::from(expanded)
}

fn expand_env_vars(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            }
        } else {
            let end = after
                .char_indices()
                .find(|(i, c)| !(c.is_ascii_alphanumeric() || *c == '_') || (*i == 0 && c.is_ascii_digit()))
                .map(|(i, _)| i)
                .unwrap_or(after.len());
            (&after[..end], end)
        };
        match (!name.is_empty()).then(|| std::env::var(name).ok()).flatten() {
            Some(value) => out.push_str(&value),
            None => {
                out.push('$');
                out.push_str(&after[..consumed]);
            }
        }
        rest = &after[consumed..];
    }
    out.push_str(rest);
    out
}
