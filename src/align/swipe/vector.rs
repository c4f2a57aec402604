//! Fixed-width saturating score lanes
//!
//! `ScoreVector<T, N>` is a plain `[T; N]` with lane-wise saturating
//! arithmetic. The loops are branch-free so the compiler lowers them to packed
//! SSE/AVX/NEON instructions; no intrinsics are needed.

use std::fmt::Debug;
use std::ops::{Index, IndexMut};

/// Scalar score type usable in a lane
pub trait SwipeScore: Copy + Ord + Default + Send + Sync + Debug + 'static {
    const MIN: Self;
    const MAX: Self;
    const ZERO: Self;
    /// Lanes in a 128-bit register
    const LANES_128: usize;

    /// Saturating conversion from i32
    fn from_i32(v: i32) -> Self;
    fn to_i32(self) -> i32;
    fn sat_add(self, other: Self) -> Self;
    fn sat_sub(self, other: Self) -> Self;
}

macro_rules! impl_swipe_score {
    ($t:ty, $lanes:expr) => {
        impl SwipeScore for $t {
            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;
            const ZERO: Self = 0;
            const LANES_128: usize = $lanes;

            #[inline(always)]
            fn from_i32(v: i32) -> Self {
                v.clamp(<$t>::MIN as i32, <$t>::MAX as i32) as $t
            }

            #[inline(always)]
            fn to_i32(self) -> i32 {
                self as i32
            }

            #[inline(always)]
            fn sat_add(self, other: Self) -> Self {
                self.saturating_add(other)
            }

            #[inline(always)]
            fn sat_sub(self, other: Self) -> Self {
                self.saturating_sub(other)
            }
        }
    };
}

impl_swipe_score!(i8, 16);
impl_swipe_score!(i16, 8);
impl_swipe_score!(i32, 4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreVector<T, const N: usize>([T; N]);

impl<T: SwipeScore, const N: usize> ScoreVector<T, N> {
    #[inline(always)]
    pub fn splat(v: T) -> Self {
        Self([v; N])
    }

    #[inline(always)]
    pub fn zero() -> Self {
        Self::splat(T::ZERO)
    }

    #[inline(always)]
    pub fn min_value() -> Self {
        Self::splat(T::MIN)
    }

    #[inline(always)]
    pub fn from_array(lanes: [T; N]) -> Self {
        Self(lanes)
    }

    #[inline(always)]
    pub fn adds(self, other: Self) -> Self {
        let mut out = self.0;
        for (o, b) in out.iter_mut().zip(other.0) {
            *o = o.sat_add(b);
        }
        Self(out)
    }

    #[inline(always)]
    pub fn subs(self, other: Self) -> Self {
        let mut out = self.0;
        for (o, b) in out.iter_mut().zip(other.0) {
            *o = o.sat_sub(b);
        }
        Self(out)
    }

    #[inline(always)]
    pub fn max(self, other: Self) -> Self {
        let mut out = self.0;
        for (o, b) in out.iter_mut().zip(other.0) {
            *o = (*o).max(b);
        }
        Self(out)
    }

    /// Lanes where `mask` is false take the value from `other`
    #[inline(always)]
    pub fn keep(self, mask: &[bool; N], other: Self) -> Self {
        let mut out = self.0;
        for ((o, &m), b) in out.iter_mut().zip(mask).zip(other.0) {
            if !m {
                *o = b;
            }
        }
        Self(out)
    }

    /// True if any lane holds `T::MAX`
    #[inline(always)]
    pub fn any_saturated(&self) -> bool {
        self.0.iter().any(|&v| v == T::MAX)
    }

    pub fn lanes(&self) -> &[T; N] {
        &self.0
    }
}

impl<T, const N: usize> Index<usize> for ScoreVector<T, N> {
    type Output = T;

    #[inline(always)]
    fn index(&self, lane: usize) -> &T {
        &self.0[lane]
    }
}

impl<T, const N: usize> IndexMut<usize> for ScoreVector<T, N> {
    #[inline(always)]
    fn index_mut(&mut self, lane: usize) -> &mut T {
        &mut self.0[lane]
    }
}
