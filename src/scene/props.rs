use glam::Vec2;

use crate::config::PlacementConfig;
use crate::geometry::{rand_range, Rect};

/// Mushroom art catalog. Natural sizes are the source image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MushroomAsset {
    Amanita,
    Balloon,
    Spiral,
    Group,
    Long,
    Basic,
    Oyster,
    HenOfWoods,
    ElfinSaddle,
    Chanterelle,
}

impl MushroomAsset {
    pub const ALL: [MushroomAsset; 10] = [
        Self::Amanita,
        Self::Balloon,
        Self::Spiral,
        Self::Group,
        Self::Long,
        Self::Basic,
        Self::Oyster,
        Self::HenOfWoods,
        Self::ElfinSaddle,
        Self::Chanterelle,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Amanita => "assets/mushrooms/amanita.png",
            Self::Balloon => "assets/mushrooms/balloon.png",
            Self::Spiral => "assets/mushrooms/spiral.png",
            Self::Group => "assets/mushrooms/group.png",
            Self::Long => "assets/mushrooms/long.png",
            Self::Basic => "assets/mushrooms/basic.png",
            Self::Oyster => "assets/mushrooms/oyster.png",
            Self::HenOfWoods => "assets/mushrooms/hen_of_woods.png",
            Self::ElfinSaddle => "assets/mushrooms/elfin_saddle.png",
            Self::Chanterelle => "assets/mushrooms/chanterelle.png",
        }
    }

    /// Source image size in pixels (width, height).
    pub fn natural_size(self) -> Vec2 {
        let (w, h) = match self {
            Self::Amanita => (420.0, 460.0),
            Self::Balloon => (380.0, 400.0),
            Self::Spiral => (300.0, 420.0),
            Self::Group => (560.0, 380.0),
            Self::Long => (220.0, 520.0),
            Self::Basic => (360.0, 360.0),
            Self::Oyster => (480.0, 300.0),
            Self::HenOfWoods => (520.0, 400.0),
            Self::ElfinSaddle => (260.0, 440.0),
            Self::Chanterelle => (340.0, 380.0),
        };
        Vec2::new(w, h)
    }

    /// Cap color used by the renderer, RGBA packed.
    pub fn tint(self) -> u32 {
        let [r, g, b] = match self {
            Self::Amanita => [220, 40, 50],
            Self::Balloon => [240, 150, 200],
            Self::Spiral => [170, 110, 230],
            Self::Group => [200, 140, 80],
            Self::Long => [235, 220, 180],
            Self::Basic => [190, 70, 60],
            Self::Oyster => [210, 205, 190],
            Self::HenOfWoods => [160, 110, 60],
            Self::ElfinSaddle => [90, 80, 80],
            Self::Chanterelle => [250, 180, 40],
        };
        (r as u32) << 24 | (g as u32) << 16 | (b as u32) << 8 | 0xFF
    }

    fn random(rng: &mut fastrand::Rng) -> Self {
        Self::ALL[rng.usize(0..Self::ALL.len())]
    }
}

/// A placed mushroom. Immutable once planted.
#[derive(Debug, Clone, Copy)]
pub struct Prop {
    pub asset: MushroomAsset,
    /// Top-left corner.
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// True when the planner ran out of tries and kept an overlapping spot.
    pub overlap_fallback: bool,
}

impl Prop {
    /// Occupancy rectangle used for overlap and avoidance checks.
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }
}

/// Planner output.
#[derive(Debug, Clone)]
pub struct Placement {
    pub props: Vec<Prop>,
    /// How many props fell back to an overlapping position.
    pub exhausted: usize,
}

/// Rendered size for an asset: scaled natural width clamped to the config
/// range, height following the asset's aspect ratio.
pub fn prop_size(asset: MushroomAsset, cfg: &PlacementConfig) -> Vec2 {
    let natural = asset.natural_size();
    let width = (natural.x * cfg.asset_scale).clamp(cfg.min_width, cfg.max_width);
    Vec2::new(width, width * natural.y / natural.x)
}

/// Scatter `count` mushrooms across the ground band of a `width` x `height`
/// container. Always returns exactly `count` props.
///
/// Each prop gets `cfg.max_tries` samples to find a spot that touches no
/// previously accepted prop. If none is found, the last sample is kept and the
/// prop is flagged `overlap_fallback`; fallback props are not added to the
/// occupancy set.
pub fn place(
    count: usize,
    width: f32,
    height: f32,
    cfg: &PlacementConfig,
    rng: &mut fastrand::Rng,
) -> Placement {
    let band_min = height * cfg.band_top;
    let band_max = height * cfg.band_bottom;

    let mut props = Vec::with_capacity(count);
    let mut occupied: Vec<Rect> = Vec::with_capacity(count);
    let mut exhausted = 0;

    for i in 0..count {
        let asset = MushroomAsset::random(rng);
        let size = prop_size(asset, cfg);
        let x_min = cfg.edge_margin;
        let x_max = width - size.x - cfg.edge_margin;

        let mut candidate = Rect::new(x_min, band_min, size.x, size.y);
        let mut placed = false;
        for _ in 0..cfg.max_tries.max(1) {
            let x = rand_range(rng, x_min, x_max);
            let y = rand_range(rng, band_min, band_max);
            candidate = Rect::new(x, y, size.x, size.y);
            if !occupied.iter().any(|r| r.intersects(&candidate)) {
                placed = true;
                break;
            }
        }

        if placed {
            occupied.push(candidate);
        } else {
            exhausted += 1;
            log::debug!(
                "mushroom {i} kept an overlapping spot after {} tries",
                cfg.max_tries
            );
        }

        props.push(Prop {
            asset,
            pos: Vec2::new(candidate.x, candidate.y),
            width: size.x,
            height: size.y,
            overlap_fallback: !placed,
        });
    }

    Placement { props, exhausted }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn overlapping_pairs(props: &[Prop]) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for i in 0..props.len() {
            for j in (i + 1)..props.len() {
                if props[i].rect().intersects(&props[j].rect()) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    #[test]
    fn returns_exact_count() {
        let cfg = PlacementConfig::default();
        let mut rng = fastrand::Rng::with_seed(1);
        for count in [0, 1, 10, 16, 20] {
            let placement = place(count, 800.0, 600.0, &cfg, &mut rng);
            assert_eq!(placement.props.len(), count);
        }
    }

    #[test]
    fn stays_inside_ground_band() {
        let cfg = PlacementConfig::default();
        let mut rng = fastrand::Rng::with_seed(42);
        let placement = place(14, 800.0, 600.0, &cfg, &mut rng);
        assert_eq!(placement.props.len(), 14);

        for p in &placement.props {
            assert!(p.pos.y >= 360.0 - EPS && p.pos.y <= 516.0 + EPS, "y = {}", p.pos.y);
            assert!(p.pos.x >= 16.0 - EPS, "x = {}", p.pos.x);
            assert!(p.pos.x <= 784.0 - p.width + EPS, "x = {} w = {}", p.pos.x, p.width);
            assert!(p.width >= cfg.min_width && p.width <= cfg.max_width);
        }
    }

    #[test]
    fn overlap_only_involves_fallback_props() {
        let cfg = PlacementConfig::default();
        for seed in 0..32 {
            let mut rng = fastrand::Rng::with_seed(seed);
            let placement = place(20, 400.0, 300.0, &cfg, &mut rng);

            let fallbacks = placement.props.iter().filter(|p| p.overlap_fallback).count();
            assert_eq!(fallbacks, placement.exhausted);

            for (i, j) in overlapping_pairs(&placement.props) {
                assert!(
                    placement.props[i].overlap_fallback || placement.props[j].overlap_fallback,
                    "seed {seed}: props {i} and {j} overlap without exhausting tries"
                );
            }
        }
    }

    #[test]
    fn roomy_container_has_no_overlap() {
        let cfg = PlacementConfig::default();
        let mut rng = fastrand::Rng::with_seed(9);
        let placement = place(6, 4000.0, 3000.0, &cfg, &mut rng);
        assert_eq!(placement.exhausted, 0);
        assert!(overlapping_pairs(&placement.props).is_empty());
    }

    #[test]
    fn single_try_budget_still_places_everything() {
        let cfg = PlacementConfig {
            max_tries: 1,
            ..PlacementConfig::default()
        };
        let mut rng = fastrand::Rng::with_seed(5);
        let placement = place(40, 400.0, 300.0, &cfg, &mut rng);
        assert_eq!(placement.props.len(), 40);
        // Two rows of at most eight props is all a 400x300 band can hold.
        assert!(placement.exhausted > 0);
    }

    #[test]
    fn size_follows_clamp_and_aspect() {
        let cfg = PlacementConfig::default();
        for asset in MushroomAsset::ALL {
            let size = prop_size(asset, &cfg);
            let natural = asset.natural_size();
            assert!(size.x >= 44.0 && size.x <= 120.0);
            assert!((size.y / size.x - natural.y / natural.x).abs() < 1e-4);
        }
        assert!((prop_size(MushroomAsset::Long, &cfg).x - 48.4).abs() < EPS);
        assert_eq!(prop_size(MushroomAsset::Group, &cfg).x, 120.0);
    }
}
