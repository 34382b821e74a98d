// BT.601 weights in Q14, the same rounding OpenCV uses for RGB to gray
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

pub fn rgb_to_luma(data: &[u8]) -> Vec<u8> {
    data.chunks_exact(3)
        .map(|c| {
            let sum = c[0] as u32 * LUMA_R + c[1] as u32 * LUMA_G + c[2] as u32 * LUMA_B;
            ((sum + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8
        })
        .collect()
}

// YUYV already carries luma in every even byte
pub fn yuyv_to_luma(data: &[u8]) -> Vec<u8> {
    data.iter().step_by(2).copied().collect()
}
