use rayon::{
    iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Source neighbours and blend weight for one destination row or column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Tap {
    lo: usize,
    hi: usize,
    w: u32, // 0..=256 toward `hi`
}

fn taps(dst: usize, src: usize) -> Vec<Tap> {
    let ratio = src as f32 / dst as f32;
    let last = src.saturating_sub(1);
    (0..dst)
        .map(|i| {
            let f = i as f32 * ratio;
            let lo = (f.floor() as usize).min(last);
            Tap {
                lo,
                hi: (lo + 1).min(last),
                w: ((f - lo as f32) * 256.0).round().clamp(0.0, 256.0) as u32,
            }
        })
        .collect()
}

#[inline]
fn blend(a: u32, b: u32, w: u32) -> u32 {
    let inv = 256 - w;
    // red and blue share one multiply, green gets its own
    let rb = (((a & 0x00FF00FF) * inv + (b & 0x00FF00FF) * w) >> 8) & 0x00FF00FF;
    let g = (((a & 0x0000FF00) * inv + (b & 0x0000FF00) * w) >> 8) & 0x0000FF00;
    rb | g
}

/// Bilinear stretch of the fixed-size game canvas onto the window.
pub struct Stretch {
    src: (usize, usize),
    dst: (usize, usize),
    cols: Vec<Tap>,
    rows: Vec<Tap>,
}

impl Stretch {
    pub fn new(src_w: usize, src_h: usize, dst_w: usize, dst_h: usize) -> Self {
        Self {
            src: (src_w, src_h),
            dst: (dst_w, dst_h),
            cols: taps(dst_w, src_w),
            rows: taps(dst_h, src_h),
        }
    }

    /// Rebuilds the tables only when the window size actually changed.
    pub fn resize(&mut self, dst_w: usize, dst_h: usize) {
        if self.dst != (dst_w, dst_h) {
            *self = Self::new(self.src.0, self.src.1, dst_w, dst_h);
        }
    }

    /// Rows are written in parallel.
    pub fn blit(&self, src: &[u32], dst: &mut [u32]) {
        let (sw, _) = self.src;
        let (dw, _) = self.dst;
        if dw == 0 {
            return;
        }
        dst.par_chunks_mut(dw)
            .zip(self.rows.par_iter())
            .for_each(|(out, row)| {
                let r0 = &src[row.lo * sw..(row.lo + 1) * sw];
                let r1 = &src[row.hi * sw..(row.hi + 1) * sw];
                for (px, col) in out.iter_mut().zip(&self.cols) {
                    let top = blend(r0[col.lo], r0[col.hi], col.w);
                    let bottom = blend(r1[col.lo], r1[col.hi], col.w);
                    *px = blend(top, bottom, row.w);
                }
            });
    }
}
