//! Path Filter: decides which filesystem entries take part in collection.
//!
//! Every rule here is a lookup in one of the policy tables below; nothing is
//! special-cased per file. All functions are pure predicates over names and paths.

use std::path::Path;

/// File extensions (including the leading dot) that are always collected.
pub const INCLUDE_EXTENSIONS: &[&str] = &[
    // source
    ".py", ".rs", ".go", ".java", ".kt", ".kts", ".scala", ".rb", ".php", ".cs", ".c", ".h",
    ".cc", ".cpp", ".hpp", ".swift", ".m", ".js", ".jsx", ".mjs", ".cjs", ".ts", ".tsx",
    ".vue", ".svelte", ".dart", ".ex", ".exs", ".sh", ".bash", ".ps1", ".sql", ".proto",
    ".graphql", ".tf",
    // web
    ".html", ".css", ".scss",
    // config
    ".toml", ".yaml", ".yml", ".json", ".ini", ".cfg", ".conf", ".xml", ".gradle", ".lock",
    // docs
    ".md", ".rst", ".txt",
];

/// Basenames collected regardless of extension: build manifests, lockfiles,
/// container and CI files.
pub const KEY_FILENAMES: &[&str] = &[
    "Dockerfile",
    "docker-compose.yml",
    "docker-compose.yaml",
    "compose.yml",
    "compose.yaml",
    ".dockerignore",
    "Makefile",
    "Justfile",
    "Procfile",
    "Vagrantfile",
    "Gemfile",
    "Gemfile.lock",
    "Pipfile",
    "Pipfile.lock",
    "requirements.txt",
    "setup.py",
    "setup.cfg",
    "pyproject.toml",
    "poetry.lock",
    "package.json",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "tsconfig.json",
    "vite.config.ts",
    "vite.config.js",
    "Cargo.toml",
    "Cargo.lock",
    "go.mod",
    "go.sum",
    "pom.xml",
    "build.gradle",
    "composer.json",
    "composer.lock",
    ".gitlab-ci.yml",
    ".travis.yml",
    "Jenkinsfile",
    "LICENSE",
    "LICENSE.md",
    ".gitignore",
];

/// Directory basenames that are pruned before descending.
pub const SKIP_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "bower_components",
    "vendor",
    "target",
    "dist",
    "build",
    ".next",
    ".nuxt",
    ".turbo",
    ".cache",
    "coverage",
    "__pycache__",
    ".mypy_cache",
    ".pytest_cache",
    ".ruff_cache",
    ".tox",
    ".venv",
    "venv",
    ".idea",
    ".vscode",
    ".gradle",
];

/// Dependency lockfiles whose content is machine-generated and voluminous.
pub const LOCK_BASENAMES: &[&str] = &[
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "poetry.lock",
    "Pipfile.lock",
    "Cargo.lock",
    "Gemfile.lock",
    "composer.lock",
    "go.sum",
];

/// Extensions of structured config files that are head-truncated.
pub const STRUCTURED_CONFIG_EXTENSIONS: &[&str] = &[".json", ".yaml", ".yml"];

/// Lowercased basenames treated as a previous README.
pub const README_NAMES: &[&str] = &["readme", "readme.md", "readme.rst", "readme.txt"];

/// Prefix of environment files; these are always collected and always redacted.
pub const ENV_PREFIX: &str = ".env";

/// Extension of `name`, including the leading dot.
///
/// A dot in first position does not start an extension, so `.env` has none
/// while `.env.local` has `.local`.
pub fn extension_of(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => &name[idx..],
        _ => "",
    }
}

fn basename(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or("")
}

pub fn is_env_file(name: &str) -> bool {
    name.starts_with(ENV_PREFIX)
}

/// Whether a file is eligible for collection by extension, key filename or `.env` prefix.
pub fn is_eligible(path: &Path) -> bool {
    let name = basename(path);
    if name.is_empty() {
        return false;
    }
    INCLUDE_EXTENSIONS.contains(&extension_of(name))
        || KEY_FILENAMES.contains(&name)
        || is_env_file(name)
}

/// Whether a directory with this basename is pruned from the walk.
pub fn is_skipped_dir(name: &str) -> bool {
    SKIP_DIRS.contains(&name)
}

/// Case-insensitive README match.
pub fn is_readme_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    README_NAMES.contains(&lower.as_str())
}

pub fn is_lock_like(path: &Path) -> bool {
    let name = basename(path);
    LOCK_BASENAMES.contains(&name) || extension_of(name) == ".lock"
}

pub fn is_structured_config(path: &Path) -> bool {
    STRUCTURED_CONFIG_EXTENSIONS.contains(&extension_of(basename(path)))
}
