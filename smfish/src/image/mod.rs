//! Array element types and the image, mask and label aliases used across the
//! pipeline.
//!
//! Images are row-major `ndarray` arrays with shape `(z, y, x)` or `(y, x)`.

mod check;


use ndarray::{Array2, ArrayD};

pub use check::{
    check_array, check_same_shape, check_spots, ArrayCheck, IMAGE, IMAGE_ALLOW_NAN, IMAGE_DTYPES,
    LABELS, MASK,
};

/// Boolean array marking candidate or kept pixels.
pub type Mask = ArrayD<bool>;

/// Connected-component labels: 0 is background, 1..=n identify components.
pub type LabelImage = ArrayD<u32>;

/// Spot coordinates, one row per spot and one column per image axis.
///
/// Row order is the row-major iteration order of the mask the spots were
/// extracted from. The row index is the spot identity.
pub type Spots = Array2<usize>;

/// Element type of an array, named the way numpy names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Dtype {
    #[strum(to_string = "bool")]
    Bool,
    #[strum(to_string = "uint8")]
    U8,
    #[strum(to_string = "uint16")]
    U16,
    #[strum(to_string = "uint32")]
    U32,
    #[strum(to_string = "int64")]
    I64,
    #[strum(to_string = "float32")]
    F32,
    #[strum(to_string = "float64")]
    F64,
}

/// Any array element the validators understand.
pub trait Element: Copy + Send + Sync + 'static {
    const DTYPE: Dtype;

    #[inline]
    fn is_nan(self) -> bool {
        false
    }
}

/// Numeric pixel type.
pub trait Pixel: Element + PartialOrd + Default + std::fmt::Debug {
    /// Full-scale value of integer types, used to map intensities to `[0, 1]`.
    /// `None` for floating-point types, which are used as is.
    const FULL_SCALE: Option<f64>;

    fn to_f64(self) -> f64;

    /// Cast from `f64` with truncation toward zero, saturating at the type
    /// bounds. NaN maps to zero for integer types.
    fn from_f64(value: f64) -> Self;

    /// Intensity mapped to `[0, 1]` for integer types, unchanged for floats.
    #[inline]
    fn normalized(self) -> f64 {
        match Self::FULL_SCALE {
            Some(scale) => self.to_f64() / scale,
            None => self.to_f64(),
        }
    }

    /// Inverse of [`Pixel::normalized`].
    #[inline]
    fn from_normalized(value: f64) -> Self {
        match Self::FULL_SCALE {
            Some(scale) => Self::from_f64(value * scale),
            None => Self::from_f64(value),
        }
    }
}

impl Element for bool {
    const DTYPE: Dtype = Dtype::Bool;
}

macro_rules! impl_integer_pixel {
    ($t:ty, $dtype:expr) => {
        impl Element for $t {
            const DTYPE: Dtype = $dtype;
        }

        impl Pixel for $t {
            const FULL_SCALE: Option<f64> = Some(<$t>::MAX as f64);

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(value: f64) -> Self {
                value as $t
            }
        }
    };
}

macro_rules! impl_float_pixel {
    ($t:ty, $dtype:expr) => {
        impl Element for $t {
            const DTYPE: Dtype = $dtype;

            #[inline]
            fn is_nan(self) -> bool {
                <$t>::is_nan(self)
            }
        }

        impl Pixel for $t {
            const FULL_SCALE: Option<f64> = None;

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(value: f64) -> Self {
                value as $t
            }
        }
    };
}

impl_integer_pixel!(u8, Dtype::U8);
impl_integer_pixel!(u16, Dtype::U16);
impl_integer_pixel!(u32, Dtype::U32);
impl_integer_pixel!(i64, Dtype::I64);
impl_float_pixel!(f32, Dtype::F32);
impl_float_pixel!(f64, Dtype::F64);
