//! Ordered parameter spaces.
//!
//! A [`ParamSpace`] is a list of `(key, resolver)` pairs. Resolution walks the
//! list front to back and every resolver sees the values produced before it,
//! so derived parameters (pixel boxes, byte colors) are declared after the
//! random draws they are computed from.

use std::{fmt, sync::Arc};

use rand::{Rng, rngs::SmallRng};
use rand_distr::{Distribution, Normal};

use crate::error::{SceneError, SceneResult};

/// Smallest canvas-relative extent a sampled width or height may take.
pub const MIN_EXTENT: f32 = 0.02;

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i32),
    Index(usize),
    /// Canvas-relative pair, e.g. `_wh` or `_cxy`.
    Pair([f32; 2]),
    /// Canvas-relative triple, e.g. `_rgb`.
    Triple([f32; 3]),
    /// Pixel-space pair, e.g. `wh` or `cxy`.
    Point([i32; 2]),
    Color([u8; 3]),
    /// Pixel-space `[x0, y0, x1, y1]`, both corners inclusive.
    Rect([i32; 4]),
    Text(String),
}

impl Value {
    fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Index(_) => "index",
            Value::Pair(_) => "pair",
            Value::Triple(_) => "triple",
            Value::Point(_) => "point",
            Value::Color(_) => "color",
            Value::Rect(_) => "rect",
            Value::Text(_) => "text",
        }
    }
}

/// Values produced by one resolution pass, in resolution order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Params {
    entries: Vec<(&'static str, Value)>,
}

macro_rules! typed_getter {
    ($name:ident, $variant:ident, $ty:ty, $kind:literal) => {
        pub fn $name(&self, key: &str) -> SceneResult<$ty> {
            match self.get(key)? {
                Value::$variant(v) => Ok(v.clone()),
                other => Err(SceneError::ParamType {
                    key: key.to_string(),
                    expected: $kind,
                    found: other.kind(),
                }),
            }
        }
    };
}

impl Params {
    pub fn get(&self, key: &str) -> SceneResult<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
            .ok_or_else(|| SceneError::DependencyOrder {
                key: key.to_string(),
            })
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, key: &'static str, value: Value) {
        self.entries.push((key, value));
    }

    typed_getter!(int, Int, i32, "int");
    typed_getter!(index, Index, usize, "index");
    typed_getter!(pair, Pair, [f32; 2], "pair");
    typed_getter!(triple, Triple, [f32; 3], "triple");
    typed_getter!(point, Point, [i32; 2], "point");
    typed_getter!(color, Color, [u8; 3], "color");
    typed_getter!(rect, Rect, [i32; 4], "rect");
    typed_getter!(text, Text, String, "text");
}

pub type Resolver = Arc<dyn Fn(&Params, u32, &mut SmallRng) -> SceneResult<Value> + Send + Sync>;

/// Wraps a closure into a [`Resolver`].
pub fn resolver<F>(f: F) -> Resolver
where
    F: Fn(&Params, u32, &mut SmallRng) -> SceneResult<Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

#[derive(Clone, Default)]
pub struct ParamSpace {
    entries: Vec<(&'static str, Resolver)>,
}

impl fmt::Debug for ParamSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}

impl ParamSpace {
    /// Builds a space, rejecting duplicate keys.
    pub fn new(entries: Vec<(&'static str, Resolver)>) -> SceneResult<Self> {
        for (i, (key, _)) in entries.iter().enumerate() {
            if entries[..i].iter().any(|(k, _)| k == key) {
                return Err(SceneError::configuration(format!(
                    "duplicate parameter `{key}`"
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Built-in spaces whose keys are literals in this crate.
    pub(crate) fn declared(entries: Vec<(&'static str, Resolver)>) -> Self {
        debug_assert!(
            Self::new(entries.clone()).is_ok(),
            "duplicate key in built-in space"
        );
        Self { entries }
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn resolver(&self, key: &str) -> Option<&Resolver> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, r)| r)
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&'static str, Resolver)> + '_ {
        self.entries.iter().cloned()
    }

    pub fn resolve(&self, canvas: u32, rng: &mut SmallRng) -> SceneResult<Params> {
        let mut params = Params::default();
        for (key, resolve) in &self.entries {
            let value = resolve(&params, canvas, rng)?;
            params.insert(key, value);
        }
        Ok(params)
    }

    /// Returns a copy of this space where every entry whose key appears in
    /// `overrides` uses the override's resolver. Order and length are kept;
    /// override keys missing here are dropped.
    pub fn overridden(&self, overrides: &ParamSpace) -> ParamSpace {
        let entries = self
            .entries
            .iter()
            .map(|(key, own)| {
                let r = overrides.resolver(key).unwrap_or(own);
                (*key, Arc::clone(r))
            })
            .collect();
        ParamSpace { entries }
    }
}

pub(crate) fn normal(mean: f32, sd: f32) -> SceneResult<Normal<f32>> {
    Normal::new(mean, sd)
        .map_err(|e| SceneError::configuration(format!("normal({mean}, {sd}): {e}")))
}

/// Two independent normal draws, clamped to [`MIN_EXTENT`].
pub fn extent(mean: f32, sd: f32) -> Resolver {
    resolver(move |_, _, rng| {
        let dist = normal(mean, sd)?;
        Ok(Value::Pair([
            dist.sample(rng).max(MIN_EXTENT),
            dist.sample(rng).max(MIN_EXTENT),
        ]))
    })
}

pub fn uniform_pair() -> Resolver {
    resolver(|_, _, rng| Ok(Value::Pair([rng.random_range(0.0..1.0), rng.random_range(0.0..1.0)])))
}

pub fn uniform_triple() -> Resolver {
    resolver(|_, _, rng| {
        Ok(Value::Triple([
            rng.random_range(0.0..1.0),
            rng.random_range(0.0..1.0),
            rng.random_range(0.0..1.0),
        ]))
    })
}

pub fn constant(value: Value) -> Resolver {
    resolver(move |_, _, _| Ok(value.clone()))
}

/// `rgb` from `_rgb`: each channel scaled by 256 and truncated.
pub fn rgb() -> Resolver {
    resolver(|p, _, _| {
        let c = p.triple("_rgb")?;
        Ok(Value::Color(c.map(|v| (v * 256.0) as u8)))
    })
}

/// Scales a canvas-relative pair to pixels.
pub fn to_canvas(key: &'static str) -> Resolver {
    resolver(move |p, canvas, _| {
        let v = p.pair(key)?;
        Ok(Value::Point(v.map(|x| (x * canvas as f32) as i32)))
    })
}

/// Pixel box centered on `_cxy` with extent `_wh`, at least one pixel wide.
pub fn bounding_box() -> Resolver {
    resolver(|p, canvas, _| {
        let [cx, cy] = p.pair("_cxy")?;
        let [w, h] = p.pair("_wh")?;
        let size = canvas as f32;
        let x = ((cx - w / 2.0) * size) as i32;
        let y = ((cy - h / 2.0) * size) as i32;
        let pw = ((w * size) as i32).max(1);
        let ph = ((h * size) as i32).max(1);
        Ok(Value::Rect([x, y, x + pw, y + ph]))
    })
}

/// Uniform index over `len` options; an empty pool is reported as `primitive`'s.
pub fn choice(len: usize, primitive: &'static str, pool: String) -> Resolver {
    resolver(move |_, _, rng| {
        if len == 0 {
            return Err(SceneError::empty_pool(primitive, pool.clone()));
        }
        Ok(Value::Index(rng.random_range(0..len)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rect_space() -> ParamSpace {
        ParamSpace::new(vec![
            ("_wh", extent(0.4, 0.2)),
            ("_cxy", uniform_pair()),
            ("_rgb", uniform_triple()),
            ("rgb", rgb()),
            ("box", bounding_box()),
        ])
        .unwrap()
    }

    #[test]
    fn resolves_in_declared_order() {
        let space = rect_space();
        let mut rng = SmallRng::seed_from_u64(1);
        let a = space.resolve(64, &mut rng).unwrap();
        let b = space.resolve(64, &mut rng).unwrap();

        let expected = ["_wh", "_cxy", "_rgb", "rgb", "box"];
        assert_eq!(a.keys().collect::<Vec<_>>(), expected);
        assert_eq!(b.keys().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn random_draws_are_fresh_each_pass() {
        let space = rect_space();
        let mut rng = SmallRng::seed_from_u64(7);
        let xs: Vec<f32> = (0..500)
            .map(|_| space.resolve(128, &mut rng).unwrap().pair("_cxy").unwrap()[0])
            .collect();

        let mean = xs.iter().sum::<f32>() / xs.len() as f32;
        let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f32>() / xs.len() as f32;
        // uniform(0, 1) has variance 1/12
        assert!((mean - 0.5).abs() < 0.05, "mean {mean}");
        assert!(var > 0.05, "variance {var}");
    }

    #[test]
    fn extents_never_drop_below_minimum() {
        let space = ParamSpace::new(vec![("_wh", extent(0.4, 0.2))]).unwrap();
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..2000 {
            let [w, h] = space.resolve(128, &mut rng).unwrap().pair("_wh").unwrap();
            assert!(w >= MIN_EXTENT && h >= MIN_EXTENT);
        }
    }

    #[test]
    fn reading_a_later_key_is_a_dependency_error() {
        let space = ParamSpace::new(vec![
            ("rgb", rgb()),
            ("_rgb", uniform_triple()),
        ])
        .unwrap();
        let mut rng = SmallRng::seed_from_u64(0);
        let err = space.resolve(32, &mut rng).unwrap_err();
        assert!(matches!(err, SceneError::DependencyOrder { ref key } if key == "_rgb"));
    }

    #[test]
    fn wrong_kind_is_a_type_error() {
        let space = ParamSpace::new(vec![
            ("_rgb", constant(Value::Int(3))),
            ("rgb", rgb()),
        ])
        .unwrap();
        let mut rng = SmallRng::seed_from_u64(0);
        let err = space.resolve(32, &mut rng).unwrap_err();
        assert!(matches!(err, SceneError::ParamType { expected: "triple", .. }));
    }

    #[test]
    fn duplicate_keys_rejected_at_construction() {
        let err = ParamSpace::new(vec![
            ("_cxy", uniform_pair()),
            ("_cxy", uniform_pair()),
        ])
        .unwrap_err();
        assert!(matches!(err, SceneError::Configuration(_)));
    }

    #[test]
    fn override_replaces_in_place() {
        let space = rect_space();
        let forced = ParamSpace::new(vec![
            ("_wh", constant(Value::Pair([1.0, 1.0]))),
            ("_cxy", constant(Value::Pair([0.5, 0.5]))),
        ])
        .unwrap();

        let out = space.overridden(&forced);
        assert_eq!(out.len(), space.len());
        assert_eq!(out.keys().collect::<Vec<_>>(), space.keys().collect::<Vec<_>>());
        assert!(Arc::ptr_eq(
            out.resolver("_wh").unwrap(),
            forced.resolver("_wh").unwrap()
        ));
        assert!(Arc::ptr_eq(
            out.resolver("_rgb").unwrap(),
            space.resolver("_rgb").unwrap()
        ));

        let mut rng = SmallRng::seed_from_u64(5);
        let p = out.resolve(100, &mut rng).unwrap();
        assert_eq!(p.rect("box").unwrap(), [0, 0, 100, 100]);
    }

    #[test]
    fn override_ignores_unknown_keys() {
        let space = rect_space();
        let other = ParamSpace::new(vec![("i_font", constant(Value::Index(0)))]).unwrap();

        let out = space.overridden(&other);
        assert_eq!(out.keys().collect::<Vec<_>>(), space.keys().collect::<Vec<_>>());
        for key in space.keys() {
            assert!(Arc::ptr_eq(
                out.resolver(key).unwrap(),
                space.resolver(key).unwrap()
            ));
        }
    }

    #[test]
    fn empty_choice_reports_pool() {
        let space = ParamSpace::new(vec![("idx", choice(0, "Photo", "nowhere".into()))]).unwrap();
        let mut rng = SmallRng::seed_from_u64(0);
        let err = space.resolve(8, &mut rng).unwrap_err();
        assert!(matches!(err, SceneError::EmptyResourcePool { primitive: "Photo", .. }));
    }
}
