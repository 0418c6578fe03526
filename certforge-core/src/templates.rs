//! Template Resolution - Category/Rank/Session to Filename
//!
//! Resolution is a pure function of (category, rank, session).
//! Two policies share one resolver:
//! - FixedName: `<region prefix>-<rank>.png`, unknown categories rejected
//! - CodedSession: `<session><area code><rank code>.png`, never fails

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::layout::Layout;
use crate::pipeline::RenderError;

/// Rank labels the issuing office uses.
pub const KNOWN_RANKS: [&str; 2] = ["优秀", "合格"];

/// Session used when the session string carries no number at all.
pub const DEFAULT_SESSION: &str = "8";

const CJK_NUMERALS: [(char, &str); 10] = [
    ('一', "1"),
    ('二', "2"),
    ('三', "3"),
    ('四', "4"),
    ('五', "5"),
    ('六', "6"),
    ('七', "7"),
    ('八', "8"),
    ('九', "9"),
    ('十', "10"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// Six positional arguments, region and rank spelled out in the filename
    FixedName,
    /// Seven positional arguments, filename built from short codes
    CodedSession,
}

impl Policy {
    /// Number of positional arguments the policy's CLI surface requires
    pub fn arity(self) -> usize {
        match self {
            Policy::FixedName => 6,
            Policy::CodedSession => 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Weifang,
    Xuzhou,
    Other,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Weifang, Region::Xuzhou, Region::Other];

    /// Exact category label accepted by the fixed-name policy
    pub fn label(self) -> &'static str {
        match self {
            Region::Weifang => "潍坊市参培教师",
            Region::Xuzhou => "徐州市参培教师",
            Region::Other => "其他人员",
        }
    }

    pub fn from_label(category: &str) -> Option<Region> {
        Region::ALL.into_iter().find(|r| r.label() == category)
    }

    /// Marker match used by the coded policy. Xuzhou wins over Weifang.
    pub fn from_marker(category: &str) -> Region {
        let lowered = category.to_lowercase();
        if category.contains("徐州") || lowered.contains("xuzhou") {
            Region::Xuzhou
        } else if category.contains("潍坊") || lowered.contains("weifang") {
            Region::Weifang
        } else {
            Region::Other
        }
    }

    pub fn fixed_prefix(self) -> &'static str {
        match self {
            Region::Weifang => "潍坊",
            Region::Xuzhou => "徐州",
            Region::Other => "社会人员证书",
        }
    }

    pub fn area_code(self) -> &'static str {
        match self {
            Region::Xuzhou => "xz",
            Region::Weifang => "wf",
            Region::Other => "sh",
        }
    }

    pub fn layout(self) -> Layout {
        match self {
            Region::Weifang | Region::Xuzhou => Layout::ParticipatingTeacher,
            Region::Other => Layout::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankCode {
    Excellent,
    Qualified,
}

impl RankCode {
    pub fn from_marker(rank: &str) -> RankCode {
        if rank.contains("优秀") || rank.to_lowercase().contains("excellent") {
            RankCode::Excellent
        } else {
            RankCode::Qualified
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            RankCode::Excellent => "yx",
            RankCode::Qualified => "hg",
        }
    }
}

/// Where a session number came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionSource {
    Arabic,
    Numeral(char),
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionNumber {
    pub value: String,
    pub source: SessionSource,
}

impl SessionNumber {
    /// First run of ASCII digits, else the first recognised CJK numeral
    /// (checked one through ten), else the default session.
    pub fn parse(session: &str) -> SessionNumber {
        let digits: String = session
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if !digits.is_empty() {
            return SessionNumber { value: digits, source: SessionSource::Arabic };
        }

        for (numeral, value) in CJK_NUMERALS {
            if session.contains(numeral) {
                return SessionNumber {
                    value: value.to_string(),
                    source: SessionSource::Numeral(numeral),
                };
            }
        }

        SessionNumber {
            value: DEFAULT_SESSION.to_string(),
            source: SessionSource::Default,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == SessionSource::Default
    }
}

/// Non-fatal fallback taken during resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ResolutionNotice {
    SessionDefaulted { session: String, used: String },
}

impl fmt::Display for ResolutionNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionNotice::SessionDefaulted { session, used } => write!(
                f,
                "No session number found in {:?}, using session {}",
                session, used
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateResolution {
    pub policy: Policy,
    pub filename: String,
    pub layout: Layout,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<ResolutionNotice>,
}

/// Resolve a template for the given policy.
///
/// `session` is only consulted by the coded policy; a missing session there
/// behaves like one without a number.
pub fn resolve(
    policy: Policy,
    category: &str,
    rank: &str,
    session: Option<&str>,
) -> Result<TemplateResolution, RenderError> {
    match policy {
        Policy::FixedName => resolve_fixed(category, rank),
        Policy::CodedSession => Ok(resolve_coded(category, rank, session.unwrap_or(""))),
    }
}

pub fn resolve_fixed(category: &str, rank: &str) -> Result<TemplateResolution, RenderError> {
    let region = Region::from_label(category)
        .ok_or_else(|| RenderError::UnknownCategory(category.to_string()))?;

    Ok(TemplateResolution {
        policy: Policy::FixedName,
        filename: format!("{}-{}.png", region.fixed_prefix(), rank),
        layout: region.layout(),
        notices: vec![],
    })
}

pub fn resolve_coded(category: &str, rank: &str, session: &str) -> TemplateResolution {
    let region = Region::from_marker(category);
    let rank_code = RankCode::from_marker(rank);
    let session_number = SessionNumber::parse(session);

    let mut notices = vec![];
    if session_number.is_fallback() {
        notices.push(ResolutionNotice::SessionDefaulted {
            session: session.to_string(),
            used: session_number.value.clone(),
        });
    }

    TemplateResolution {
        policy: Policy::CodedSession,
        filename: format!(
            "{}{}{}.png",
            session_number.value,
            region.area_code(),
            rank_code.code()
        ),
        layout: region.layout(),
        notices,
    }
}

/// One template a resolver can produce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub policy: Policy,
    pub category: String,
    pub rank: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    pub filename: String,
    pub layout: Layout,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub present: Option<bool>,
}

/// Every filename the resolvers produce for the known categories and ranks.
///
/// Coded entries are listed once per session; duplicates (two session
/// strings with the same number) are collapsed.
pub fn catalog(sessions: &[String], resource_dir: Option<&Path>) -> Vec<CatalogEntry> {
    let mut entries = vec![];

    for region in Region::ALL {
        for rank in KNOWN_RANKS {
            if let Ok(resolution) = resolve_fixed(region.label(), rank) {
                entries.push(CatalogEntry {
                    policy: Policy::FixedName,
                    category: region.label().to_string(),
                    rank: rank.to_string(),
                    session: None,
                    filename: resolution.filename,
                    layout: resolution.layout,
                    present: None,
                });
            }
        }
    }

    for session in sessions {
        for region in Region::ALL {
            for rank in KNOWN_RANKS {
                let resolution = resolve_coded(region.label(), rank, session);
                if entries.iter().any(|e| e.filename == resolution.filename) {
                    continue;
                }
                entries.push(CatalogEntry {
                    policy: Policy::CodedSession,
                    category: region.label().to_string(),
                    rank: rank.to_string(),
                    session: Some(session.clone()),
                    filename: resolution.filename,
                    layout: resolution.layout,
                    present: None,
                });
            }
        }
    }

    if let Some(dir) = resource_dir {
        for entry in &mut entries {
            entry.present = Some(dir.join(&entry.filename).is_file());
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_name_regions() {
        let r = resolve_fixed("徐州市参培教师", "优秀").unwrap();
        assert_eq!(r.filename, "徐州-优秀.png");
        assert_eq!(r.layout, Layout::ParticipatingTeacher);

        let r = resolve_fixed("潍坊市参培教师", "合格").unwrap();
        assert_eq!(r.filename, "潍坊-合格.png");
        assert_eq!(r.layout, Layout::ParticipatingTeacher);

        let r = resolve_fixed("其他人员", "优秀").unwrap();
        assert_eq!(r.filename, "社会人员证书-优秀.png");
        assert_eq!(r.layout, Layout::Other);
    }

    #[test]
    fn test_fixed_name_rank_is_verbatim() {
        let r = resolve_fixed("徐州市参培教师", "良好").unwrap();
        assert_eq!(r.filename, "徐州-良好.png");
    }

    #[test]
    fn test_fixed_name_rejects_unknown_category() {
        let err = resolve_fixed("徐州教师", "优秀").unwrap_err();
        assert!(matches!(err, RenderError::UnknownCategory(ref c) if c == "徐州教师"));
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn test_resolution_is_pure() {
        for region in Region::ALL {
            for rank in KNOWN_RANKS {
                let a = resolve_fixed(region.label(), rank).unwrap();
                let b = resolve_fixed(region.label(), rank).unwrap();
                assert_eq!(a, b);
            }
        }
        assert_eq!(
            resolve_coded("徐州市参培教师", "优秀", "第三期"),
            resolve_coded("徐州市参培教师", "优秀", "第三期")
        );
    }

    #[test]
    fn test_session_arabic_digits() {
        assert_eq!(SessionNumber::parse("第8期").value, "8");
        assert_eq!(SessionNumber::parse("Session12").value, "12");
        assert_eq!(SessionNumber::parse("12期 第3批").value, "12");
        assert_eq!(SessionNumber::parse("第二期 2").source, SessionSource::Arabic);
    }

    #[test]
    fn test_session_cjk_numerals() {
        let s = SessionNumber::parse("第八期");
        assert_eq!(s.value, "8");
        assert_eq!(s.source, SessionSource::Numeral('八'));
        assert_eq!(SessionNumber::parse("第十期").value, "10");
        assert_eq!(SessionNumber::parse("第一期").value, "1");
    }

    #[test]
    fn test_session_numeral_priority_is_one_to_ten() {
        // 十 ranks after 八, regardless of where it appears
        assert_eq!(SessionNumber::parse("十八期").value, "8");
        assert_eq!(SessionNumber::parse("第九三期").value, "3");
    }

    #[test]
    fn test_session_default() {
        let s = SessionNumber::parse("春季班");
        assert_eq!(s.value, DEFAULT_SESSION);
        assert!(s.is_fallback());
        assert!(SessionNumber::parse("").is_fallback());
    }

    #[test]
    fn test_area_codes() {
        assert_eq!(Region::from_marker("徐州市参培教师").area_code(), "xz");
        assert_eq!(Region::from_marker("潍坊市参培教师").area_code(), "wf");
        assert_eq!(Region::from_marker("Xuzhou teachers").area_code(), "xz");
        assert_eq!(Region::from_marker("其他人员").area_code(), "sh");
        assert_eq!(Region::from_marker("").area_code(), "sh");
        // both markers present: Xuzhou is checked first
        assert_eq!(Region::from_marker("潍坊徐州联合").area_code(), "xz");
    }

    #[test]
    fn test_rank_codes() {
        assert_eq!(RankCode::from_marker("优秀").code(), "yx");
        assert_eq!(RankCode::from_marker("非常优秀").code(), "yx");
        assert_eq!(RankCode::from_marker("合格").code(), "hg");
        assert_eq!(RankCode::from_marker("anything").code(), "hg");
    }

    #[test]
    fn test_coded_resolution() {
        let r = resolve_coded("徐州市参培教师", "优秀", "第八期");
        assert_eq!(r.filename, "8xzyx.png");
        assert_eq!(r.layout, Layout::ParticipatingTeacher);
        assert!(r.notices.is_empty());

        let r = resolve_coded("其他人员", "合格", "Session12");
        assert_eq!(r.filename, "12shhg.png");
        assert_eq!(r.layout, Layout::Other);
    }

    #[test]
    fn test_coded_resolution_notices_fallback() {
        let r = resolve_coded("潍坊市参培教师", "合格", "春季班");
        assert_eq!(r.filename, "8wfhg.png");
        assert_eq!(r.notices.len(), 1);
        assert!(r.notices[0].to_string().contains("春季班"));
    }

    #[test]
    fn test_resolve_dispatches_on_policy() {
        let r = resolve(Policy::CodedSession, "未知", "优秀", None).unwrap();
        assert_eq!(r.filename, "8shyx.png");
        assert!(resolve(Policy::FixedName, "未知", "优秀", None).is_err());
    }

    #[test]
    fn test_catalog_lists_both_policies() {
        let entries = catalog(&["第八期".to_string(), "8".to_string()], None);
        assert_eq!(entries.iter().filter(|e| e.policy == Policy::FixedName).count(), 6);
        // second session resolves to the same filenames
        assert_eq!(entries.iter().filter(|e| e.policy == Policy::CodedSession).count(), 6);
        assert!(entries.iter().any(|e| e.filename == "8xzyx.png"));
        assert!(entries.iter().all(|e| e.present.is_none()));
    }
}
