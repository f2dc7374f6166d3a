//! 置换表
//!
//! 用于缓存已搜索过的局面，避免重复计算。每次顶层搜索开始时整表清空。

use std::sync::atomic::{AtomicU64, Ordering};

use gomoku_core::Move;

/// 置换表条目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    /// 精确值
    Exact,
    /// 下界（Beta 截断）
    LowerBound,
    /// 上界（Alpha 截断）
    UpperBound,
}

/// 置换表条目
#[derive(Debug, Clone, Copy)]
pub struct TTEntry {
    /// 完整的 Zobrist 哈希（用于验证）
    pub key: u64,
    /// 评估分数
    pub score: i32,
    /// 搜索深度（剩余层数）
    pub depth: u8,
    /// 条目类型
    pub entry_type: EntryType,
    /// 最佳走法
    pub best_move: Option<Move>,
}

/// 置换表
///
/// 使用固定大小的哈希表
pub struct TranspositionTable {
    /// 条目数组
    entries: Vec<Option<TTEntry>>,
    /// 表大小（条目数）
    size: usize,
    /// 命中次数
    hits: AtomicU64,
    /// 查询次数
    lookups: AtomicU64,
}

impl TranspositionTable {
    /// 创建指定大小的置换表
    ///
    /// # Arguments
    /// * `size_mb` - 表大小（MB）
    pub fn new(size_mb: usize) -> Self {
        let entry_size = std::mem::size_of::<Option<TTEntry>>();
        let size = ((size_mb * 1024 * 1024) / entry_size).max(1);

        Self {
            entries: vec![None; size],
            size,
            hits: AtomicU64::new(0),
            lookups: AtomicU64::new(0),
        }
    }

    /// 计算索引
    #[inline]
    fn index(&self, hash: u64) -> usize {
        (hash % self.size as u64) as usize
    }

    /// 查询条目
    pub fn lookup(&self, hash: u64) -> Option<&TTEntry> {
        self.lookups.fetch_add(1, Ordering::Relaxed);

        if let Some(ref entry) = self.entries[self.index(hash)] {
            if entry.key == hash {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry);
            }
        }

        None
    }

    /// 存储条目
    pub fn store(
        &mut self,
        hash: u64,
        score: i32,
        depth: u8,
        entry_type: EntryType,
        best_move: Option<Move>,
    ) {
        let index = self.index(hash);

        // 替换策略：
        // 1. 空槽或同一局面直接写入
        // 2. 新条目深度不小于旧条目时替换
        let should_replace = match &self.entries[index] {
            None => true,
            Some(existing) => existing.key == hash || depth >= existing.depth,
        };

        if should_replace {
            self.entries[index] = Some(TTEntry {
                key: hash,
                score,
                depth,
                entry_type,
                best_move,
            });
        }
    }

    /// 清空表
    pub fn clear(&mut self) {
        self.entries.fill(None);
        self.hits.store(0, Ordering::Relaxed);
        self.lookups.store(0, Ordering::Relaxed);
    }

    /// 获取命中率
    pub fn hit_rate(&self) -> f64 {
        self.stats().hit_rate()
    }

    /// 获取统计信息
    pub fn stats(&self) -> TTStats {
        TTStats {
            size_mb: (self.size * std::mem::size_of::<Option<TTEntry>>()) / (1024 * 1024),
            entries: self.size,
            used: self.entries.iter().filter(|e| e.is_some()).count(),
            hits: self.hits.load(Ordering::Relaxed),
            lookups: self.lookups.load(Ordering::Relaxed),
        }
    }
}

/// 置换表统计信息
#[derive(Debug, Clone)]
pub struct TTStats {
    pub size_mb: usize,
    pub entries: usize,
    pub used: usize,
    pub hits: u64,
    pub lookups: u64,
}

impl TTStats {
    pub fn hit_rate(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            self.hits as f64 / self.lookups as f64
        }
    }

    pub fn usage(&self) -> f64 {
        self.used as f64 / self.entries as f64
    }
}
