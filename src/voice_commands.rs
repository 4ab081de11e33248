use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::normalize::{normalize, strip_tail_particle};
use crate::trie::CommandTrie;

/// 匹配方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    Exact,
    Fuzzy,
    Unrecognized,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Exact => "exact",
            MatchMode::Fuzzy => "fuzzy",
            MatchMode::Unrecognized => "unrecognized",
        }
    }

    /// 界面上显示的名称
    pub fn label(&self) -> &'static str {
        match self {
            MatchMode::Exact => "精确匹配",
            MatchMode::Fuzzy => "模糊匹配",
            MatchMode::Unrecognized => "未识别",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 匹配结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub mode: MatchMode,
    /// 命中的原始指令（词典中的写法），未识别时为 None
    pub command: Option<String>,
    /// 去语气词并归一化后的查询文本
    pub normalized: String,
}

impl MatchResult {
    pub fn is_recognized(&self) -> bool {
        self.command.is_some()
    }
}

/// 语音指令匹配器
///
/// 构建后只读，可以在多个线程间共享。
#[derive(Debug)]
pub struct VoiceCommandMatcher {
    trie: CommandTrie,
    /// 归一化 key → 原始指令，冲突时保留第一条
    originals: HashMap<String, String>,
}

impl VoiceCommandMatcher {
    /// 由词典条目构建匹配器：逐条归一化后插入字典树，再计算长度集
    pub fn build<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = CommandTrie::new();
        let mut originals: HashMap<String, String> = HashMap::new();
        let mut keys = Vec::new();
        let mut total = 0usize;

        for entry in entries {
            let cmd = entry.as_ref();
            let key = normalize(cmd);
            total += 1;

            if trie.insert(&key, cmd) {
                originals.insert(key.clone(), cmd.to_string());
            } else if let Some(kept) = originals.get(&key) {
                log::warn!("指令 “{cmd}” 归一化后与 “{kept}” 冲突 ({key})，保留第一条");
            }
            keys.push(key);
        }

        trie.set_valid_lens(&keys);

        let matcher = Self { trie, originals };
        log::info!(
            "已加载 {} 条指令，{} 个归一化 key，合法长度 {:?}",
            total,
            matcher.len(),
            matcher.sorted_valid_lens()
        );
        matcher
    }

    /// 归一化 key 的合法长度集
    pub fn valid_lens(&self) -> &HashSet<usize> {
        self.trie.valid_lens()
    }

    fn sorted_valid_lens(&self) -> Vec<usize> {
        let mut lens: Vec<usize> = self.valid_lens().iter().copied().collect();
        lens.sort_unstable();
        lens
    }

    /// 设置是否启用长度剪枝
    pub fn set_length_check(&mut self, enabled: bool) {
        self.trie.set_length_check(enabled);
    }

    pub fn length_check(&self) -> bool {
        self.trie.length_check()
    }

    /// 先精确匹配，失败再模糊匹配
    pub fn lookup(&self, raw: &str) -> MatchResult {
        let normalized = normalize(strip_tail_particle(raw.trim()));
        self.match_normalized(normalized)
    }

    /// 对已归一化的文本执行匹配
    pub fn match_normalized(&self, normalized: String) -> MatchResult {
        let (mode, command) = if let Some(hit) = self.trie.match_exact(&normalized) {
            (MatchMode::Exact, Some(hit.to_string()))
        } else if let Some(hit) = self.trie.match_fuzzy_sub1(&normalized) {
            (MatchMode::Fuzzy, Some(hit.to_string()))
        } else {
            (MatchMode::Unrecognized, None)
        };

        log::debug!("匹配 {normalized} → {mode} {command:?}");
        MatchResult {
            mode,
            command,
            normalized,
        }
    }

    /// 归一化 key 对应的原始指令
    pub fn original_for(&self, key: &str) -> Option<&str> {
        self.originals.get(key).map(String::as_str)
    }

    /// 不同归一化 key 的数量
    pub fn len(&self) -> usize {
        self.originals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    pub fn trie(&self) -> &CommandTrie {
        &self.trie
    }
}
