use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// 字典树节点
///
/// 子节点按字符排序，模糊匹配的分支顺序因此是确定的。
/// 只有结尾节点带有原始指令文本。
#[derive(Debug, Default)]
pub struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    payload: Option<String>,
}

impl TrieNode {
    /// 是否是一条指令的结尾
    pub fn is_terminal(&self) -> bool {
        self.payload.is_some()
    }

    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }

    pub fn child(&self, ch: char) -> Option<&TrieNode> {
        self.children.get(&ch)
    }
}

/// 指令字典树 + 长度剪枝
///
/// 先 `insert` 全部指令，再 `set_valid_lens`，之后只读。
#[derive(Debug)]
pub struct CommandTrie {
    root: TrieNode,
    valid_lens: HashSet<usize>,
    length_check: bool,
    walks: AtomicUsize,
}

impl Default for CommandTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandTrie {
    pub fn new() -> Self {
        Self {
            root: TrieNode::default(),
            valid_lens: HashSet::new(),
            length_check: true,
            walks: AtomicUsize::new(0),
        }
    }

    /// 插入一条指令
    ///
    /// `key` 是归一化后的指令，`payload` 是命中后返回的原始指令。
    /// 同一个 key 重复插入时保留第一次的 payload，返回值表示这次是否生效。
    pub fn insert(&mut self, key: &str, payload: &str) -> bool {
        let mut node = &mut self.root;
        for ch in key.chars() {
            node = node.children.entry(ch).or_default();
        }
        if node.payload.is_some() {
            return false;
        }
        node.payload = Some(payload.to_string());
        true
    }

    /// 用全部 key 重新计算合法长度集（不是累加）
    pub fn set_valid_lens<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.valid_lens = keys
            .into_iter()
            .map(|key| key.as_ref().chars().count())
            .collect();
    }

    /// 设置是否启用长度检查（默认开启）
    pub fn set_length_check(&mut self, enabled: bool) {
        self.length_check = enabled;
    }

    pub fn length_check(&self) -> bool {
        self.length_check
    }

    pub fn valid_lens(&self) -> &HashSet<usize> {
        &self.valid_lens
    }

    /// 通过长度剪枝后实际开始的树遍历次数
    pub fn walks(&self) -> usize {
        self.walks.load(Ordering::Relaxed)
    }

    /// 精确匹配：完全一致才返回原始指令
    pub fn match_exact(&self, text: &str) -> Option<&str> {
        if self.length_check && !self.valid_lens.contains(&text.chars().count()) {
            return None;
        }
        self.walks.fetch_add(1, Ordering::Relaxed);

        let mut node = &self.root;
        for ch in text.chars() {
            node = node.child(ch)?;
        }
        node.payload()
    }

    /// 模糊匹配，最多允许 1 次编辑：
    ///
    /// - 多一个字：跳过输入中的该字符（不消耗树边）
    /// - 错一个字：走另一条子边（同时消耗字符和树边）
    ///
    /// 深度优先，分支顺序为 正常匹配 > 跳过 > 替换，返回第一个命中的结果，
    /// 不保证是全局最接近的指令。
    pub fn match_fuzzy_sub1(&self, text: &str) -> Option<&str> {
        let chars: Vec<char> = text.chars().collect();
        if self.length_check {
            // 只补偿比指令多一个字的情况
            let len = chars.len();
            let admissible = self.valid_lens.contains(&len)
                || (len > 0 && self.valid_lens.contains(&(len - 1)));
            if !admissible {
                return None;
            }
        }
        self.walks.fetch_add(1, Ordering::Relaxed);

        fuzzy_dfs(&self.root, &chars, 0, false)
    }
}

fn fuzzy_dfs<'a>(node: &'a TrieNode, text: &[char], i: usize, used_error: bool) -> Option<&'a str> {
    let Some(&cur) = text.get(i) else {
        return node.payload();
    };

    if let Some(child) = node.child(cur) {
        if let Some(hit) = fuzzy_dfs(child, text, i + 1, used_error) {
            return Some(hit);
        }
    }

    if used_error {
        return None;
    }

    if let Some(hit) = fuzzy_dfs(node, text, i + 1, true) {
        return Some(hit);
    }

    node.children
        .iter()
        .filter(|&(&ch, _)| ch != cur)
        .find_map(|(_, child)| fuzzy_dfs(child, text, i + 1, true))
}
