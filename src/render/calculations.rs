//! Pure calculation functions for canvas and module geometry.
//!
//! All functions here are pure and testable without any I/O or images.

/// Edge length actually rendered for a requested size.
///
/// The symbol must fit the container minus its fixed padding, so the result
/// is `min(requested, container_width - padding)`, saturating at zero when
/// the container is narrower than the padding.
///
/// # Examples
/// ```
/// # use qrstyle::render::effective_size;
/// assert_eq!(effective_size(300, 1000, 40), 300);
/// assert_eq!(effective_size(300, 280, 40), 240);
/// assert_eq!(effective_size(300, 20, 40), 0);
/// ```
pub fn effective_size(requested: u32, container_width: u32, padding: u32) -> u32 {
    requested.min(container_width.saturating_sub(padding))
}

/// Placement of the module grid on a square canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleLayout {
    /// Edge of one module in pixels.
    pub dot: u32,
    /// Offset of the grid from the canvas edge, centering it.
    pub offset: u32,
}

impl ModuleLayout {
    /// Edge of the whole module grid in pixels.
    pub fn symbol_px(&self, modules: u32) -> u32 {
        self.dot * modules
    }
}

/// Fit `modules` whole-pixel modules onto a `canvas` pixel square.
///
/// Returns `None` when the canvas cannot give every module at least one pixel.
pub fn module_layout(canvas: u32, modules: u32) -> Option<ModuleLayout> {
    if modules == 0 {
        return None;
    }
    let dot = canvas / modules;
    if dot == 0 {
        return None;
    }
    Some(ModuleLayout {
        dot,
        offset: (canvas - dot * modules) / 2,
    })
}

/// Scale a logo to fit a square of `symbol_px * image_size`, keeping its aspect ratio.
///
/// Both returned dimensions are at least one pixel.
pub fn logo_fit(symbol_px: u32, image_size: f32, logo: (u32, u32)) -> (u32, u32) {
    let (w, h) = logo;
    let max_edge = (symbol_px as f32 * image_size).floor().max(1.0);
    let longest = w.max(h).max(1) as f32;
    let scale = max_edge / longest;
    let fit = |v: u32| ((v as f32 * scale).round() as u32).max(1);
    (fit(w), fit(h))
}

/// Whether a module lies inside one of the three 7×7 finder patterns.
pub fn is_finder_module(x: u32, y: u32, modules: u32) -> bool {
    let near = |v: u32| v < 7;
    let far = |v: u32| v + 7 >= modules;
    (near(x) && near(y)) || (far(x) && near(y)) || (near(x) && far(y))
}

/// Top-left module coordinates of the three finder patterns.
pub fn finder_origins(modules: u32) -> [(u32, u32); 3] {
    let far = modules.saturating_sub(7);
    [(0, 0), (far, 0), (0, far)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_size_never_exceeds_container() {
        for container in [0, 1, 39, 40, 41, 100, 340, 1000] {
            for requested in [1, 100, 300, 1000] {
                let size = effective_size(requested, container, 40);
                assert!(size <= container.saturating_sub(40));
                assert!(size <= requested);
            }
        }
    }

    #[test]
    fn effective_size_keeps_request_when_it_fits() {
        assert_eq!(effective_size(300, 340, 40), 300);
        assert_eq!(effective_size(300, 339, 40), 299);
    }

    #[test]
    fn module_layout_centers_grid() {
        // 25 modules on 300px → 12px modules, 300 px of which 300 used
        assert_eq!(
            module_layout(300, 25),
            Some(ModuleLayout { dot: 12, offset: 0 })
        );
        // 25 modules on 310px → 12px modules, 10px spare, 5px each side
        assert_eq!(
            module_layout(310, 25),
            Some(ModuleLayout { dot: 12, offset: 5 })
        );
    }

    #[test]
    fn module_layout_rejects_tiny_canvas() {
        assert_eq!(module_layout(20, 21), None);
        assert_eq!(module_layout(0, 21), None);
        assert_eq!(module_layout(100, 0), None);
    }

    #[test]
    fn logo_fit_keeps_aspect() {
        assert_eq!(logo_fit(300, 0.4, (100, 100)), (120, 120));
        assert_eq!(logo_fit(300, 0.4, (200, 100)), (120, 60));
        assert_eq!(logo_fit(300, 0.4, (50, 400)), (15, 120));
    }

    #[test]
    fn logo_fit_never_collapses() {
        assert_eq!(logo_fit(10, 0.01, (1000, 1)), (1, 1));
    }

    #[test]
    fn finder_modules_cover_three_corners() {
        let n = 21;
        assert!(is_finder_module(0, 0, n));
        assert!(is_finder_module(6, 6, n));
        assert!(!is_finder_module(7, 7, n));
        assert!(is_finder_module(20, 0, n));
        assert!(is_finder_module(14, 6, n));
        assert!(is_finder_module(0, 20, n));
        assert!(!is_finder_module(20, 20, n));
        assert_eq!(finder_origins(n), [(0, 0), (14, 0), (0, 14)]);
    }
}
