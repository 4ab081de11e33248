//! TSV 测试集：读取、写入、生成
//!
//! 每行 `<asr_文本>\t<期望_命令>`，UTF-8 编码。

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::{MatcherError, Result};
use crate::normalize::TAIL_PARTICLES;

/// 模拟 ASR 多识别出来的字
pub const EXTRA_WORDS: [char; 10] = ['请', '帮', '给', '先', '快', '把', '下', '个', '点', '来'];

/// 一条测试用例
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetCase {
    pub input: String,
    pub expected: String,
}

/// 测试集类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    /// 随机位置多一个字
    ExtraChar,
    /// 末尾多一个语气词
    ExtraParticle,
    /// 两者都有
    ExtraCharAndParticle,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 3] = [
        DatasetKind::ExtraChar,
        DatasetKind::ExtraParticle,
        DatasetKind::ExtraCharAndParticle,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            DatasetKind::ExtraChar => "dataset_extra_char.tsv",
            DatasetKind::ExtraParticle => "dataset_extra_particle.tsv",
            DatasetKind::ExtraCharAndParticle => "dataset_extra_char_and_particle.tsv",
        }
    }

    pub fn default_seed(&self) -> u64 {
        match self {
            DatasetKind::ExtraChar => 1,
            DatasetKind::ExtraParticle => 2,
            DatasetKind::ExtraCharAndParticle => 3,
        }
    }
}

/// 读取 TSV 测试集，空行跳过，其余行必须正好两列
pub fn read_dataset(path: &Path) -> Result<Vec<DatasetCase>> {
    let content = fs::read_to_string(path).map_err(|e| MatcherError::io(path, e))?;
    let mut cases = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split('\t').collect();
        match parts.as_slice() {
            [input, expected] => cases.push(DatasetCase {
                input: input.to_string(),
                expected: expected.to_string(),
            }),
            _ => {
                return Err(MatcherError::Dataset {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    columns: parts.len(),
                })
            }
        }
    }

    Ok(cases)
}

/// 每行：input<TAB>expected
pub fn write_dataset(path: &Path, cases: &[DatasetCase]) -> Result<()> {
    let mut content = String::new();
    for case in cases {
        let _ = writeln!(content, "{}\t{}", case.input, case.expected);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| MatcherError::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| MatcherError::io(path, e))
}

/// 按类型生成 `count` 条用例，相同 seed 结果相同
pub fn generate(kind: DatasetKind, commands: &[String], count: usize, seed: u64) -> Vec<DatasetCase> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut cases = Vec::with_capacity(count);

    for _ in 0..count {
        let Some(cmd) = commands.choose(&mut rng) else {
            break;
        };
        let input = match kind {
            DatasetKind::ExtraChar => insert_one_char(cmd, pick(&EXTRA_WORDS, &mut rng), &mut rng),
            DatasetKind::ExtraParticle => {
                let mut s = cmd.clone();
                s.push(pick(&TAIL_PARTICLES, &mut rng));
                s
            }
            DatasetKind::ExtraCharAndParticle => {
                let extra = pick(&EXTRA_WORDS, &mut rng);
                let particle = pick(&TAIL_PARTICLES, &mut rng);
                let mut s = insert_one_char(cmd, extra, &mut rng);
                s.push(particle);
                s
            }
        };
        cases.push(DatasetCase {
            input,
            expected: cmd.clone(),
        });
    }

    cases
}

fn pick<R: Rng>(chars: &[char], rng: &mut R) -> char {
    chars[rng.gen_range(0..chars.len())]
}

/// 在指令中随机位置插入一个字，不插在末尾
fn insert_one_char<R: Rng>(cmd: &str, extra: char, rng: &mut R) -> String {
    let mut chars: Vec<char> = cmd.chars().collect();
    if chars.len() <= 1 {
        chars.push(extra);
    } else {
        let pos = rng.gen_range(0..chars.len());
        chars.insert(pos, extra);
    }
    chars.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commands() -> Vec<String> {
        ["打开空调", "关闭空调", "打开窗户"]
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    #[test]
    fn test_generate_is_deterministic() {
        let a = generate(DatasetKind::ExtraChar, &commands(), 30, 1);
        let b = generate(DatasetKind::ExtraChar, &commands(), 30, 1);
        assert_eq!(a, b);
        assert_eq!(a.len(), 30);
    }

    #[test]
    fn test_extra_char_inserts_one_word_not_at_end() {
        for case in generate(DatasetKind::ExtraChar, &commands(), 50, 7) {
            let input: Vec<char> = case.input.chars().collect();
            assert_eq!(input.len(), case.expected.chars().count() + 1);
            assert_eq!(input.last(), case.expected.chars().last().as_ref());
            assert!(input.iter().any(|c| EXTRA_WORDS.contains(c)));
        }
    }

    #[test]
    fn test_particle_is_appended() {
        for case in generate(DatasetKind::ExtraParticle, &commands(), 20, 2) {
            let last = case.input.chars().last().unwrap();
            assert!(TAIL_PARTICLES.contains(&last));
            assert!(case.input.starts_with(&case.expected));
        }
    }

    #[test]
    fn test_char_and_particle() {
        for case in generate(DatasetKind::ExtraCharAndParticle, &commands(), 20, 3) {
            assert_eq!(case.input.chars().count(), case.expected.chars().count() + 2);
        }
    }

    #[test]
    fn test_single_char_command_appends() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(insert_one_char("灯", '请', &mut rng), "灯请");
    }

    #[test]
    fn test_empty_commands_give_empty_dataset() {
        assert!(generate(DatasetKind::ExtraChar, &[], 10, 1).is_empty());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ds.tsv");
        let cases = generate(DatasetKind::ExtraParticle, &commands(), 5, 2);
        write_dataset(&path, &cases).unwrap();
        assert_eq!(read_dataset(&path).unwrap(), cases);
    }

    #[test]
    fn test_read_rejects_wrong_column_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.tsv");
        fs::write(&path, "关闭空调啊\t关闭空调\n\n打开空调\n").unwrap();

        match read_dataset(&path) {
            Err(MatcherError::Dataset { line, columns, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(columns, 1);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
