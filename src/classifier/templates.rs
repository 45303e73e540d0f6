//! Fixed display names, descriptions and remediation text for patterns

use crate::core::{IssueCategory, IssueType};

pub fn type_display_name(issue_type: IssueType) -> &'static str {
    match issue_type {
        IssueType::BackwardCompatibility => "Backward Compatibility",
        IssueType::LegacyCode => "Legacy Code",
        IssueType::UnnecessaryAdapter => "Unnecessary Adapters",
        IssueType::ConfusingLogic => "Confusing Logic",
        IssueType::CodeDuplication => "Code Duplication",
        IssueType::InconsistentPattern => "Inconsistent Patterns",
        IssueType::PoorNaming => "Poor Naming",
        IssueType::MissingErrorHandling => "Missing Error Handling",
        IssueType::TypeSafety => "Type Safety Issues",
        IssueType::Architectural => "Architectural Issues",
    }
}

pub fn category_display_name(category: IssueCategory) -> &'static str {
    match category {
        IssueCategory::Authentication => "Authentication",
        IssueCategory::Database => "Database",
        IssueCategory::ApiRoutes => "API Routes",
        IssueCategory::Components => "Components",
        IssueCategory::Services => "Services",
        IssueCategory::Types => "Types",
        IssueCategory::Middleware => "Middleware",
        IssueCategory::ErrorHandling => "Error Handling",
        IssueCategory::General => "General",
    }
}

/// `Type Safety Issues in Components`
pub fn pattern_name(issue_type: IssueType, category: IssueCategory) -> String {
    format!(
        "{} in {}",
        type_display_name(issue_type),
        category_display_name(category)
    )
}

/// Summary of a type×category group spanning `files` files
pub fn pattern_description(issue_type: IssueType, files: usize) -> String {
    match issue_type {
        IssueType::BackwardCompatibility => format!(
            "Backward compatibility code found in {files} files, indicating unnecessary legacy \
             support that can be removed."
        ),
        IssueType::LegacyCode => format!(
            "Legacy code patterns detected in {files} files, including commented code, unused \
             exports, or outdated implementations."
        ),
        IssueType::UnnecessaryAdapter => format!(
            "Unnecessary adapter layers found in {files} files, adding complexity without \
             providing value."
        ),
        IssueType::ConfusingLogic => format!(
            "Confusing logic patterns detected in {files} files, including deeply nested \
             conditionals or complex boolean expressions."
        ),
        IssueType::CodeDuplication => format!(
            "Code duplication found across {files} files, indicating opportunities for \
             consolidation."
        ),
        IssueType::InconsistentPattern => format!(
            "Inconsistent implementation patterns found across {files} files, reducing code \
             maintainability."
        ),
        IssueType::PoorNaming => format!(
            "Poor naming conventions detected in {files} files, affecting code readability."
        ),
        IssueType::MissingErrorHandling => format!(
            "Missing or inconsistent error handling found in {files} files, potentially causing \
             runtime issues."
        ),
        IssueType::TypeSafety => format!(
            "Type safety issues detected in {files} files, including excessive 'any' usage or \
             type assertions."
        ),
        IssueType::Architectural => format!(
            "Architectural issues found in {files} files, indicating structural problems in the \
             codebase."
        ),
    }
}

pub fn recommended_action(issue_type: IssueType) -> &'static str {
    match issue_type {
        IssueType::BackwardCompatibility => {
            "Remove backward compatibility code and update to use current patterns consistently."
        }
        IssueType::LegacyCode => {
            "Remove commented code, delete unused exports, and update outdated implementations."
        }
        IssueType::UnnecessaryAdapter => {
            "Remove adapter layers and use direct implementations where the adapter adds no value."
        }
        IssueType::ConfusingLogic => {
            "Refactor complex logic into smaller, well-named functions with clear control flow."
        }
        IssueType::CodeDuplication => {
            "Extract common logic into shared utilities or helper functions."
        }
        IssueType::InconsistentPattern => {
            "Standardize implementation patterns across all affected files."
        }
        IssueType::PoorNaming => {
            "Rename variables, functions, and files to follow consistent naming conventions."
        }
        IssueType::MissingErrorHandling => {
            "Add consistent error handling, logging, and recovery mechanisms."
        }
        IssueType::TypeSafety => {
            "Replace \"any\" types with proper type definitions and remove unnecessary type \
             assertions."
        }
        IssueType::Architectural => {
            "Refactor to address structural issues and improve overall architecture."
        }
    }
}

pub const CROSS_FILE_ACTION: &str = "Review and standardize patterns across all affected files. \
     Consider creating shared utilities or establishing coding standards.";

pub const SIMILAR_ISSUES_ACTION: &str = "Investigate the root cause of these similar issues and \
     apply a consistent fix across all affected files.";

pub fn systemic_recommendation(issue_type: IssueType, files: usize) -> String {
    format!(
        "{} Given the systemic nature ({files} files affected), consider: 1) Creating a \
         standardized solution or utility, 2) Documenting the correct pattern, 3) Applying fixes \
         in batches to minimize risk, 4) Adding automated checks to prevent recurrence.",
        recommended_action(issue_type)
    )
}

/// `s` when `count` is not one
pub(crate) fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
