//! Wrapper and adapter detection
//!
//! Flags small functions whose whole job is forwarding to another call.
//! A candidate is scored against a fixed checklist of behaviours that would
//! justify the extra layer; wrappers that add none of them are reported as
//! unnecessary, wrappers that only reshape parameters as thin.

use super::typescript::parser::node_text;
use super::typescript::syntax::{
    body_statements, call_arguments, call_expressions, callee_text, contains_kind,
    find_descendants, function_body, function_name, function_parameters, is_function_like,
    parameter_name, returned_expression, unwrap_expression,
};
use super::{AnalysisContext, Finding, PatternAnalyzer};
use crate::core::{
    EffortLevel, FileCategory, FileInfo, Issue, IssueCategory, IssueType, Severity, TypeScriptAst,
};
use once_cell::sync::Lazy;
use regex::Regex;
use tree_sitter::Node;

/// Bodies with more top-level statements are doing real work
pub const MAX_WRAPPER_STATEMENTS: usize = 3;
/// Share of parameters that must reach the delegated call unchanged
pub const PASS_THROUGH_RATIO: f64 = 0.7;
/// Statement ceiling for the pass-through shortcut
pub const MAX_PASS_THROUGH_STATEMENTS: usize = 2;

const LOOP_KINDS: &[&str] = &[
    "for_statement",
    "for_in_statement",
    "while_statement",
    "do_statement",
];

const TRANSFORMATION_CALLS: &[&str] = &[
    ".map(",
    ".filter(",
    ".reduce(",
    ".transform(",
    ".convert(",
    "Object.assign(",
    "Object.keys(",
    "Object.values(",
    "Object.entries(",
    "JSON.parse(",
    "JSON.stringify(",
    ".toString(",
    ".toUpperCase(",
    ".toLowerCase(",
    ".trim(",
    ".split(",
    ".join(",
];

static TRY_CATCH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\btry\b[\s\S]*\bcatch\b").unwrap());
static ERROR_CHECK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"if\s*\(\s*error\s*\)|if\s*\(\s*!.*\)").unwrap());
static THROW: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bthrow\b").unwrap());

static VALIDATION: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"if\s*\(\s*!.*\)",
        r"if\s*\(.*===.*\)",
        r"if\s*\(.*!==.*\)",
        r"if\s*\(.*<.*\)",
        r"if\s*\(.*>.*\)",
        r"\.validate\(",
        r"\.check\(",
        r"\.assert\(",
        r"typeof.*===",
        r"\binstanceof\b",
        r"Array\.isArray",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static SPREAD_WITH_EXTRA_KEYS_AFTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^}]*\.\.\.[^}]*,[^}]+\}").unwrap());
static SPREAD_WITH_EXTRA_KEYS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{.*\.\.\..*,.*\}").unwrap());
static DEFAULT_FALLBACK: Lazy<Regex> = Lazy::new(|| Regex::new(r"=.*(\|\||\?\?)").unwrap());

static LOGGING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"console\.|logger\.|\b(?:log|debug|info|warn|error)\(").unwrap()
});
static CACHING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)cache|memoize|localstorage|sessionstorage|redis|getitem|setitem").unwrap()
});
static RETRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)retr(?:y|ies)|\battempts?\b").unwrap());
static AUTH_CHECK: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)if\s*\([^)]*auth",
        r"(?i)if\s*\([^)]*permission",
        r"(?i)if\s*\([^)]*role",
        r"(?i)if\s*\([^)]*token",
        r"(?i)if\s*\([^)]*session",
        r"\b(?:checkAuth|verifyAuth|isAuthenticated|isAuthorized|checkPermission|checkRole|hasPermission|hasRole)\s*\(",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});
static ASSIGNMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:^|[^=!<>])=(?:[^=>]|$)").unwrap());

/// Behaviour that justifies keeping a wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddedValue {
    ErrorHandling,
    InputValidation,
    DataTransformation,
    Logging,
    Caching,
    RetryLogic,
    AuthLogic,
    ParameterTransformation,
    ParameterEnrichment,
}

impl AddedValue {
    pub fn label(&self) -> &'static str {
        match self {
            AddedValue::ErrorHandling => "error handling",
            AddedValue::InputValidation => "input validation",
            AddedValue::DataTransformation => "data transformation",
            AddedValue::Logging => "logging",
            AddedValue::Caching => "caching",
            AddedValue::RetryLogic => "retry logic",
            AddedValue::AuthLogic => "authentication/authorization",
            AddedValue::ParameterTransformation => "parameter transformation",
            AddedValue::ParameterEnrichment => "parameter enrichment",
        }
    }

    /// Naming or parameter reshaping only
    pub fn is_cosmetic(&self) -> bool {
        matches!(
            self,
            AddedValue::ParameterTransformation | AddedValue::ParameterEnrichment
        )
    }
}

/// Outcome of inspecting one function
#[derive(Debug, Clone, PartialEq)]
pub struct WrapperAnalysis {
    pub is_wrapper: bool,
    pub wrapped_function: String,
    pub added_value: Vec<AddedValue>,
}

impl WrapperAnalysis {
    pub fn adds_only_cosmetics(&self) -> bool {
        !self.added_value.is_empty() && self.added_value.iter().all(AddedValue::is_cosmetic)
    }

    fn added_labels(&self) -> String {
        self.added_value
            .iter()
            .map(AddedValue::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AdapterPatternAnalyzer;

impl AdapterPatternAnalyzer {
    pub const NAME: &'static str = "AdapterPatternAnalyzer";

    pub fn new() -> Self {
        Self
    }

    /// Report unnecessary and thin wrappers among the file's named functions
    pub fn detect_wrappers(&self, file: &FileInfo, ast: &TypeScriptAst) -> Vec<Issue> {
        let source = ast.source.as_str();
        find_descendants(ast.root(), is_function_like)
            .into_iter()
            .filter_map(|func| {
                let name = function_name(&func, source)?;
                let body = function_body(&func)?;
                let analysis = analyze_wrapper(&func, &body, source)?;
                wrapper_issue(&name, &analysis, &func, file, source)
            })
            .collect()
    }
}

impl PatternAnalyzer for AdapterPatternAnalyzer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn supported_file_types(&self) -> &'static [FileCategory] {
        &[
            FileCategory::ApiRoute,
            FileCategory::Service,
            FileCategory::Util,
            FileCategory::Middleware,
        ]
    }

    fn analyze(
        &self,
        file: &FileInfo,
        ast: &TypeScriptAst,
        _ctx: &mut AnalysisContext,
    ) -> Vec<Issue> {
        self.detect_wrappers(file, ast)
    }
}

fn wrapper_issue(
    name: &str,
    analysis: &WrapperAnalysis,
    func: &Node,
    file: &FileInfo,
    source: &str,
) -> Option<Issue> {
    if !analysis.is_wrapper {
        return None;
    }
    let target = &analysis.wrapped_function;

    let finding = if analysis.added_value.is_empty() {
        Finding::new(
            IssueType::UnnecessaryAdapter,
            Severity::Medium,
            IssueCategory::General,
            EffortLevel::Small,
        )
        .describe(
            format!(
                "Function '{}' is an unnecessary adapter that adds no meaningful value. It simply delegates to '{}' without adding error handling, validation, transformation, or other logic.",
                name, target
            ),
            removal_recommendation(name, target),
        )
        .tags(&["adapter", "unnecessary", "wrapper", "simplification"])
    } else if analysis.adds_only_cosmetics() {
        let labels = analysis.added_labels();
        Finding::new(
            IssueType::UnnecessaryAdapter,
            Severity::Low,
            IssueCategory::General,
            EffortLevel::Trivial,
        )
        .describe(
            format!(
                "Function '{}' is a thin wrapper around '{}' that adds minimal value ({}). Consider if this abstraction is necessary.",
                name, target, labels
            ),
            format!(
                "Evaluate if the wrapper function '{}' is necessary. It only adds: {}. If this abstraction doesn't provide significant value, consider removing it and calling '{}' directly.",
                name, labels, target
            ),
        )
        .tags(&["adapter", "thin-wrapper", "minimal-value"])
    } else {
        return None;
    };

    Some(finding.at(
        AdapterPatternAnalyzer::NAME,
        &file.relative_path,
        func,
        source,
    ))
}

fn removal_recommendation(name: &str, target: &str) -> String {
    format!(
        "Remove the wrapper function '{name}' and call '{target}' directly. \
         This adapter adds no meaningful value (no error handling, validation, transformation, logging, or other logic) \
         and only increases code complexity. Direct calls to '{target}' will be clearer and easier to maintain. \
         If this wrapper was created for future extensibility, consider adding it back when actual logic is needed (YAGNI principle)."
    )
}

/// Inspect a function body and decide whether it is a wrapper.
///
/// Returns `None` when the function cannot be a wrapper at all: too many
/// statements, no calls, or no identifiable delegated call.
pub fn analyze_wrapper(func: &Node, body: &Node, source: &str) -> Option<WrapperAnalysis> {
    let statements = body_statements(body);
    if statements.len() > MAX_WRAPPER_STATEMENTS {
        return None;
    }

    let calls = call_expressions(*body);
    if calls.is_empty() {
        return None;
    }

    let main_call = find_main_delegated_call(&statements, &calls)?;
    let wrapped_function = callee_text(&main_call, source)?.trim().to_string();
    if wrapped_function.is_empty() {
        return None;
    }

    let param_names: Vec<String> = function_parameters(func)
        .iter()
        .filter_map(|p| parameter_name(p, source))
        .collect();

    let body_text = node_text(body, source);
    let call_text = node_text(&main_call, source);
    let before_call = source
        .get(body.start_byte()..main_call.start_byte())
        .unwrap_or("");
    let after_call = source
        .get(main_call.end_byte()..body.end_byte())
        .unwrap_or("");

    let checks = [
        (AddedValue::ErrorHandling, has_error_handling(body, body_text)),
        (AddedValue::InputValidation, has_validation(body_text)),
        (
            AddedValue::DataTransformation,
            has_data_transformation(before_call, after_call),
        ),
        (AddedValue::Logging, LOGGING.is_match(body_text)),
        (AddedValue::Caching, CACHING.is_match(body_text)),
        (AddedValue::RetryLogic, has_retry_logic(body, body_text)),
        (
            AddedValue::AuthLogic,
            AUTH_CHECK.iter().any(|re| re.is_match(body_text)),
        ),
        (
            AddedValue::ParameterTransformation,
            has_parameter_transformation(&param_names, call_text, before_call),
        ),
        (
            AddedValue::ParameterEnrichment,
            has_parameter_enrichment(&param_names, &main_call, body_text),
        ),
    ];
    let added_value: Vec<AddedValue> = checks
        .into_iter()
        .filter_map(|(value, present)| present.then_some(value))
        .collect();

    let pass_through = is_simple_pass_through(&param_names, call_text, statements.len());
    let is_wrapper = statements.len() <= MAX_WRAPPER_STATEMENTS
        && !calls.is_empty()
        && (pass_through || added_value.is_empty());

    Some(WrapperAnalysis {
        is_wrapper,
        wrapped_function,
        added_value,
    })
}

/// The call a wrapper forwards to: a returned call (through one `await`),
/// the expression body itself, otherwise the last call in the body
fn find_main_delegated_call<'t>(statements: &[Node<'t>], calls: &[Node<'t>]) -> Option<Node<'t>> {
    if let [only] = calls {
        return Some(*only);
    }

    for stmt in statements {
        let expression = if stmt.kind() == "return_statement" {
            returned_expression(stmt)
        } else if statements.len() == 1 {
            Some(*stmt)
        } else {
            None
        };
        if let Some(expr) = expression.map(unwrap_expression) {
            if expr.kind() == "call_expression" {
                return Some(expr);
            }
        }
    }

    calls.last().copied()
}

fn has_error_handling(body: &Node, body_text: &str) -> bool {
    contains_kind(body, &["try_statement", "throw_statement"])
        || TRY_CATCH.is_match(body_text)
        || ERROR_CHECK.is_match(body_text)
        || body_text.contains(".catch(")
        || THROW.is_match(body_text)
}

fn has_validation(body_text: &str) -> bool {
    VALIDATION.iter().any(|re| re.is_match(body_text))
}

fn has_data_transformation(before_call: &str, after_call: &str) -> bool {
    let mentions = |text: &str| TRANSFORMATION_CALLS.iter().any(|m| text.contains(m));
    mentions(before_call) || mentions(after_call) || SPREAD_WITH_EXTRA_KEYS_AFTER.is_match(after_call)
}

fn has_retry_logic(body: &Node, body_text: &str) -> bool {
    contains_kind(body, LOOP_KINDS) || RETRY.is_match(body_text)
}

fn mentions_word(text: &str, word: &str) -> bool {
    Regex::new(&format!(r"(?:^|[^\w$]){}(?:[^\w$]|$)", regex::escape(word)))
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

/// A parameter has a method called on it inside the delegated call, or is
/// reassigned before the call
fn has_parameter_transformation(params: &[String], call_text: &str, before_call: &str) -> bool {
    params.iter().any(|param| {
        let method_on_param = Regex::new(&format!(r"{}\.\w+\(", regex::escape(param)))
            .map(|re| re.is_match(call_text))
            .unwrap_or(false);
        method_on_param || (mentions_word(before_call, param) && ASSIGNMENT.is_match(before_call))
    })
}

fn has_parameter_enrichment(params: &[String], main_call: &Node, body_text: &str) -> bool {
    call_arguments(main_call).len() > params.len()
        || DEFAULT_FALLBACK.is_match(body_text)
        || SPREAD_WITH_EXTRA_KEYS.is_match(body_text)
}

fn is_simple_pass_through(params: &[String], call_text: &str, statement_count: usize) -> bool {
    if params.is_empty() {
        return statement_count <= MAX_PASS_THROUGH_STATEMENTS;
    }
    let forwarded = params.iter().filter(|p| call_text.contains(p.as_str())).count();
    forwarded as f64 >= params.len() as f64 * PASS_THROUGH_RATIO
        && statement_count <= MAX_PASS_THROUGH_STATEMENTS
}
