use image::Rgb;

use mandelserve::painter::{color_of, Contrast, BLACK};
use mandelserve::palette::PLAN9;
use mandelserve::solver::Escape;
use mandelserve::{render, RenderError, Renderer};

fn is_valid_color(c: &Rgb<u8>) -> bool {
    *c == BLACK || PLAN9.iter().any(|p| p == c)
}

#[test]
fn render_is_deterministic() {
    let a = render(80, 60, Contrast(9)).unwrap();
    let b = render(80, 60, Contrast(9)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn render_fills_whole_grid_with_palette_colors() {
    for (w, h) in [(1, 1), (3, 17), (64, 64), (101, 37)] {
        let img = render(w, h, Contrast(14)).unwrap();
        assert_eq!((img.width() as i64, img.height() as i64), (w, h));
        assert_eq!(img.pixels().count() as i64, w * h);
        assert!(img.pixels().all(is_valid_color));
    }
}

#[test]
fn center_pixel_is_black_for_any_contrast() {
    for contrast in [0u8, 1, 7, 14, 15, 200, 255] {
        let img = render(100, 100, Contrast(contrast)).unwrap();
        assert_eq!(*img.get_pixel(50, 50), BLACK, "contrast {}", contrast);
    }
}

#[test]
fn corner_pixel_escapes_at_first_step() {
    let img = render(100, 100, Contrast(5)).unwrap();
    assert_eq!(*img.get_pixel(0, 0), color_of(Escape::After(0), Contrast(5)));
    assert_eq!(*img.get_pixel(0, 0), PLAN9[255]);
}

#[test]
fn contrast_wraps_palette_index() {
    assert_eq!(color_of(Escape::After(20), Contrast(15)), PLAN9[211]);
}

#[test]
fn zero_contrast_paints_every_escape_white() {
    let img = render(40, 40, Contrast(0)).unwrap();
    assert!(img.pixels().all(|p| *p == BLACK || *p == PLAN9[255]));
}

#[test]
fn invalid_dimensions_produce_no_grid() {
    assert_eq!(
        render(0, 10, Contrast(1)),
        Err(RenderError::InvalidDimension {
            width: 0,
            height: 10
        })
    );
    assert_eq!(
        render(10, -5, Contrast(1)),
        Err(RenderError::InvalidDimension {
            width: 10,
            height: -5
        })
    );
    assert!(Renderer::new(2).render(-1, -1, Contrast(1)).is_err());
}

#[test]
fn threaded_render_matches_single_threaded() {
    let single = render(123, 77, Contrast(3)).unwrap();
    for threads in [1, 2, 5, 8] {
        let renderer = Renderer::new(threads);
        assert_eq!(renderer.render(123, 77, Contrast(3)).unwrap(), single);
    }
}

#[test]
fn renderer_can_be_shared_between_threads() {
    let renderer = std::sync::Arc::new(Renderer::new(3));
    let expected = render(48, 32, Contrast(11)).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let renderer = renderer.clone();
            std::thread::spawn(move || renderer.render(48, 32, Contrast(11)).unwrap())
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}
