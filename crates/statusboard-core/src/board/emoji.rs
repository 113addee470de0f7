//! Keyword → emoji table for new help requests
//!
//! First matching keyword in table order wins; matching is a lowercase
//! substring test.

pub const DEFAULT_EMOJI: &str = "😊";

/// Ordered keyword table
pub const EMOJI_KEYWORDS: &[(&str, &str)] = &[
    // questions and help
    ("질문", "🤔"),
    ("궁금", "🤔"),
    ("어떻게", "🧐"),
    ("도움", "🆘"),
    ("문제", "⚠️"),
    ("오류", "🆘"),
    ("버그", "🆘"),
    ("에러", "🆘"),
    ("긴급", "🆘"),
    // development
    ("코드", "💻"),
    ("개발", "👨‍💻"),
    ("프로그래밍", "🖥️"),
    ("서버", "🖧"),
    ("데이터", "📊"),
    ("api", "🔌"),
    ("디자인", "🎨"),
    ("ui", "🖼️"),
    ("ux", "👆"),
    // projects
    ("프로젝트", "📂"),
    ("일정", "📅"),
    ("계획", "📝"),
    ("회의", "👥"),
    ("협업", "🤝"),
    ("팀", "👨‍👩‍👧‍👦"),
    // tech
    ("react", "⚛️"),
    ("javascript", "🟨"),
    ("typescript", "🔷"),
    ("node", "🟢"),
    ("next", "▲"),
    ("notion", "📓"),
    ("database", "🗄️"),
    // mood
    ("어려움", "😫"),
    ("힘들", "😩"),
    ("좋", "😊"),
    ("감사", "🙏"),
    ("부탁", "🙇"),
    ("급해", "🆘"),
    ("빨리", "⚡"),
];

pub fn emoji_for_content(content: &str) -> &'static str {
    let lower = content.to_lowercase();
    EMOJI_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map_or(DEFAULT_EMOJI, |(_, emoji)| emoji)
}
