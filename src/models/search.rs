use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CommandError;

/// Which entry kinds a search collects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    File,
    Folder,
    #[default]
    Both,
}

impl SearchType {
    pub fn includes_files(self) -> bool {
        matches!(self, SearchType::File | SearchType::Both)
    }

    pub fn includes_folders(self) -> bool {
        matches!(self, SearchType::Folder | SearchType::Both)
    }
}

impl FromStr for SearchType {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" | "files" => Ok(SearchType::File),
            "folder" | "folders" | "directory" | "directories" => Ok(SearchType::Folder),
            "both" | "all" | "" => Ok(SearchType::Both),
            other => Err(CommandError::unsupported(format!(
                "Unknown search type '{}' (expected file, folder or both)",
                other
            ))),
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchType::File => "file",
            SearchType::Folder => "folder",
            SearchType::Both => "both",
        };
        f.write_str(name)
    }
}

/// Name parts of a previously found file, used for semantic matching
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub path: String,
    pub name: String,
    pub name_without_ext: String,
    pub folder: String,
}

impl FileInfo {
    pub fn from_path(path: &str) -> Self {
        let p = Path::new(path);
        let name = p.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        let name_without_ext =
            p.file_stem().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        let folder = p.parent().map(|d| d.to_string_lossy().into_owned()).unwrap_or_default();
        Self { path: path.to_string(), name, name_without_ext, folder }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticMatch {
    pub path: String,
    pub name: String,
    pub similarity_score: f64,
    #[serde(rename = "type")]
    pub match_type: String,
}

impl SemanticMatch {
    pub fn new(info: &FileInfo, score: f64) -> Self {
        Self {
            path: info.path.clone(),
            name: info.name.clone(),
            // Reported with two decimals
            similarity_score: (score * 100.0).round() / 100.0,
            match_type: "semantic".to_string(),
        }
    }
}

/// Raw hit lists of one search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHits {
    pub files: Vec<String>,
    pub folders: Vec<String>,
    pub semantic_matches: Vec<SemanticMatch>,
}

impl SearchHits {
    pub fn total(&self) -> usize {
        self.files.len() + self.folders.len() + self.semantic_matches.len()
    }

    pub fn is_exact_empty(&self) -> bool {
        self.files.is_empty() && self.folders.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    pub results: SearchHits,
    pub keyword: String,
    pub search_path: String,
    pub total_found: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_path: Option<String>,
    /// Path opened by auto-resolution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opened: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_type_parsing() {
        assert_eq!("file".parse::<SearchType>().unwrap(), SearchType::File);
        assert_eq!("Folders".parse::<SearchType>().unwrap(), SearchType::Folder);
        assert_eq!("BOTH".parse::<SearchType>().unwrap(), SearchType::Both);
        assert!("images".parse::<SearchType>().is_err());
    }

    #[test]
    fn test_search_type_filters() {
        assert!(SearchType::File.includes_files());
        assert!(!SearchType::File.includes_folders());
        assert!(SearchType::Folder.includes_folders());
        assert!(!SearchType::Folder.includes_files());
        assert!(SearchType::Both.includes_files() && SearchType::Both.includes_folders());
    }

    #[test]
    fn test_file_info_from_path() {
        let info = FileInfo::from_path("/home/me/docs/resume_final.pdf");
        assert_eq!(info.name, "resume_final.pdf");
        assert_eq!(info.name_without_ext, "resume_final");
        assert_eq!(info.folder, "/home/me/docs");
    }

    #[test]
    fn test_file_info_without_extension() {
        let info = FileInfo::from_path("/srv/Makefile");
        assert_eq!(info.name, "Makefile");
        assert_eq!(info.name_without_ext, "Makefile");
    }

    #[test]
    fn test_semantic_match_rounds_score() {
        let info = FileInfo::from_path("/a/b.txt");
        let m = SemanticMatch::new(&info, 0.40567);
        assert!((m.similarity_score - 0.41).abs() < 1e-9);
        assert_eq!(m.match_type, "semantic");
    }
}
