//! ASR 文本归一化
//!
//! 词典和查询走同一套归一化，保证两侧处在同一个匹配空间。

/// 句末语气词，查询时最多去掉 1 个
pub const TAIL_PARTICLES: [char; 8] = ['啊', '呀', '吧', '呢', '哦', '哈', '嘛', '哇'];

/// 常见拆字：ASR 在双字动词中间多识别出一个字，如 “打空开” → “打开”
const SPLIT_VERB_PAIRS: [((char, char), &str); 2] = [(('打', '开'), "打开"), (('关', '闭'), "关闭")];

/// 同义动词替换，按顺序执行，后一条作用在前一条的结果上
const VERB_MAP: [(&str, &str); 6] = [
    ("打开", "开"),
    ("开启", "开"),
    ("启动", "开"),
    ("关闭", "关"),
    ("关掉", "关"),
    ("停用", "关"),
];

/// 把 ASR 输出归一化成与指令词典一致的形式
///
/// 1. 去掉所有空白
/// 2. 合并被插字拆开的双字动词
/// 3. 按 [`VERB_MAP`] 顺序做同义替换
///
/// 第 2、3 步重复到结果不再变化为止，所以 `normalize(normalize(x)) == normalize(x)`。
/// 例如 “打x打开开” 第一轮得到 “打x开”，第二轮才得到 “开”。
/// 每一轮要么不变，要么变短，循环一定结束。
pub fn normalize(text: &str) -> String {
    let mut current: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    loop {
        let next = substitute_verbs(&contract_split_verbs(&current));
        if next == current {
            return current;
        }
        current = next;
    }
}

/// 去掉末尾一个常见语气词（最多去 1 个字）
pub fn strip_tail_particle(text: &str) -> &str {
    match text.chars().next_back() {
        Some(last) if TAIL_PARTICLES.contains(&last) => &text[..text.len() - last.len_utf8()],
        _ => text,
    }
}

fn contract_split_verbs(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() < 3 {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if i + 2 < chars.len() {
            if let Some(verb) = split_verb(chars[i], chars[i + 2]) {
                out.push_str(verb);
                i += 3;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

fn split_verb(first: char, second: char) -> Option<&'static str> {
    SPLIT_VERB_PAIRS
        .iter()
        .find(|((a, b), _)| *a == first && *b == second)
        .map(|(_, verb)| *verb)
}

fn substitute_verbs(text: &str) -> String {
    VERB_MAP
        .iter()
        .fold(text.to_string(), |acc, (old, new)| acc.replace(old, new))
}
