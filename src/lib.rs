//! Logene 语音指令识别
//!
//! 把 ASR 识别出的带噪文本匹配到固定的指令集合：
//! 去语气词 → 归一化 → 字典树精确匹配 → 单错误模糊匹配。

pub mod config;
pub mod dataset;
pub mod dictionary;
pub mod error;
pub mod evaluate;
pub mod normalize;
pub mod state;
pub mod trie;
pub mod voice_commands;

pub use config::AppConfig;
pub use error::{MatcherError, Result};
pub use normalize::{normalize, strip_tail_particle};
pub use state::MatcherState;
pub use trie::{CommandTrie, TrieNode};
pub use voice_commands::{MatchMode, MatchResult, VoiceCommandMatcher};

/// 按配置加载词典并构建匹配器
pub fn build_matcher(config: &AppConfig) -> Result<VoiceCommandMatcher> {
    let commands = config.commands()?;
    Ok(build_matcher_from_commands(config, &commands))
}

/// 用已加载的词典构建匹配器，长度剪枝开关取自配置
pub fn build_matcher_from_commands(
    config: &AppConfig,
    commands: &[String],
) -> VoiceCommandMatcher {
    if commands.is_empty() {
        log::warn!("指令词典为空，所有输入都将无法识别");
    }
    let mut matcher = VoiceCommandMatcher::build(commands);
    matcher.set_length_check(config.matcher.length_check);
    matcher
}
