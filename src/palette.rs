use image::Rgb;
use lazy_static::lazy_static;

pub type Palette = [Rgb<u8>; 256];

lazy_static! {
    /// The 256 color Plan 9 color map.
    pub static ref PLAN9: Palette = plan9();
}

// Four red levels, each split into four luminance bands of sixteen entries.
// Within a band the green/blue pair rotates by `v - r` so that the grey of
// each band lands on its own slot.
fn plan9() -> Palette {
    let mut palette = [Rgb([0, 0, 0]); 256];
    let mut i = 0;
    for r in 0..4i32 {
        for v in 0..4i32 {
            let mut j = v - r;
            for g in 0..4i32 {
                for b in 0..4i32 {
                    let den = r.max(g).max(b);
                    let rgb = if den == 0 {
                        let grey = (0x11 * v) as u8;
                        [grey, grey, grey]
                    } else {
                        let num = 17 * (4 * den + v);
                        [
                            (r * num / den) as u8,
                            (g * num / den) as u8,
                            (b * num / den) as u8,
                        ]
                    };
                    palette[i + (j & 0x0f) as usize] = Rgb(rgb);
                    j += 1;
                }
            }
            i += 16;
        }
    }
    palette
}
