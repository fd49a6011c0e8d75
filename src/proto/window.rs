//! 窗口/序号算术
//!
//! 收发两端共用同一个判定函数 [`in_window`]：先把 `value` 相对 `start` 归一化到
//! `[0, space)`，再与窗口大小比较，因此天然正确处理回绕。

/// `value` 是否落在 `[start, start + size)`（模 `space`）之内。
///
/// `value >= space` 不是合法序号，永远不在任何窗口内。
#[inline]
pub fn in_window(value: u32, start: u32, size: u32, space: u32) -> bool {
    if space == 0 || value >= space {
        return false;
    }
    let (value, start, space) = (value as u64, (start % space) as u64, space as u64);
    (value + space - start) % space < size as u64
}

use crate::error::ConfigError;

/// 序号空间：窗口大小 W 与模数 2W。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeqSpace {
    window: u32,
    space: u32,
}

impl SeqSpace {
    /// 序号空间固定为窗口的两倍，保证 “是否在窗口内” 在回绕下无歧义。
    ///
    /// 窗口为 0 或 2W 超出 `u32` 时返回错误。
    pub fn new(window: u32) -> Result<Self, ConfigError> {
        if window == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        let space = window.checked_mul(2).ok_or(ConfigError::WindowTooLarge {
            window,
            space: u32::MAX,
        })?;
        Ok(Self { window, space })
    }

    pub fn window(&self) -> u32 {
        self.window
    }

    pub fn space(&self) -> u32 {
        self.space
    }

    /// 以 `start` 为左沿、大小为 W 的窗口是否包含 `value`
    pub fn contains(&self, start: u32, value: u32) -> bool {
        in_window(value, start, self.window, self.space)
    }

    /// `(v + n) mod space`
    pub fn add(&self, v: u32, n: u32) -> u32 {
        ((v as u64 + n as u64) % self.space as u64) as u32
    }

    pub fn next(&self, v: u32) -> u32 {
        self.add(v, 1)
    }

    /// 从 `from` 前进到 `to` 的步数 `(to - from) mod space`
    pub fn distance(&self, from: u32, to: u32) -> u32 {
        let space = self.space as u64;
        ((to as u64 % space + space - from as u64 % space) % space) as u32
    }

    /// 前一个窗口的左沿 `base - W`（模 space）
    pub fn previous_start(&self, base: u32) -> u32 {
        self.add(base, self.space - self.window)
    }
}
