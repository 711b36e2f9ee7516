use core::fmt;

use crate::traits::Z;

use super::{DiagMatrix, ZMatrix};

/// Layout of the paged e-format printer.
///
/// Numbers are written as `d.ddde±XX`, right-aligned in `width` columns
/// with `digits` fraction digits. Columns that do not fit in
/// `page_width` characters continue on a further page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    pub width: usize,
    pub digits: usize,
    pub page_width: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            width: 12,
            digits: 3,
            page_width: 80,
        }
    }
}

impl FormatOptions {
    /// Width of one complex entry: real field, sign, imaginary field, `i`.
    fn complex_width(&self) -> usize {
        self.width + self.digits + 10
    }
}

/// `x` in e-format, right-aligned in `width` columns.
///
/// ```
/// use zdense::zmatrix::e_format;
/// assert_eq!(e_format(1234.5678, 12, 3), "   1.235e+03");
/// assert_eq!(e_format(-0.00012, 10, 2), " -1.20e-04");
/// assert_eq!(e_format(0.0, 10, 3), " 0.000e+00");
/// assert_eq!(e_format(f64::INFINITY, 6, 3), " Infty");
/// ```
pub fn e_format(x: f64, width: usize, digits: usize) -> String {
    let s = if x.is_nan() {
        "NaN".to_string()
    } else if x.is_infinite() {
        "Infty".to_string()
    } else if x == 0.0 {
        format!("{:.*}e+00", digits, 0.0)
    } else {
        let raw = format!("{:.*e}", digits, x);
        match raw.split_once('e') {
            Some((mantissa, exp)) => {
                let e: i32 = exp.parse().unwrap_or(0);
                let sign = if e < 0 { '-' } else { '+' };
                format!("{}e{}{:02}", mantissa, sign, e.abs())
            }
            None => raw,
        }
    };
    format!("{:>width$}", s, width = width)
}

/// `z` as `re ± |im|i`, the imaginary field `digits + 6` wide.
pub fn z_format(z: Z, width: usize, digits: usize) -> String {
    let sign = if z.im < 0.0 { " - " } else { " + " };
    format!(
        "{}{}{}i",
        e_format(z.re, width, digits),
        sign,
        e_format(z.im.abs(), digits + 6, digits)
    )
}

/// A matrix paired with the options it is printed with.
pub struct Formatted<'a, M> {
    m: &'a M,
    opts: FormatOptions,
}

fn pad_left(f: &mut fmt::Formatter<'_>, s: &str, width: usize) -> fmt::Result {
    write!(f, "{:>width$}", s, width = width)
}

impl ZMatrix {
    /// Display adapter using custom layout options.
    ///
    /// ```
    /// use zdense::{FormatOptions, ZMatrix, Z};
    /// let a = ZMatrix::from_rows(1, 2, &[Z::new(1.0, 0.0), Z::new(-2.5, 0.0)]);
    /// let opts = FormatOptions { width: 10, digits: 2, page_width: 80 };
    /// let s = a.display_with(opts).to_string();
    /// assert_eq!(s, "\n           1         2\n 1  1.00e+00 -2.50e+00\n");
    /// ```
    pub fn display_with(&self, opts: FormatOptions) -> Formatted<'_, ZMatrix> {
        Formatted { m: self, opts }
    }

    fn is_real(&self) -> bool {
        self.data.iter().all(|z| z.im == 0.0)
    }
}

impl DiagMatrix {
    /// Display adapter using custom layout options.
    pub fn display_with(&self, opts: FormatOptions) -> Formatted<'_, DiagMatrix> {
        Formatted { m: self, opts }
    }
}

impl fmt::Display for Formatted<'_, ZMatrix> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = self.m;
        let o = &self.opts;
        let b = a.base.offset();
        let real = a.is_real();

        let last_label = (a.nrows + b).saturating_sub(1);
        let rfw = last_label.to_string().len() + 1;
        let cw = if real { o.width } else { o.complex_width() };
        let ncp = (o.page_width.saturating_sub(rfw) / cw).max(1);

        let mut jl = 0;
        while jl < a.ncols {
            let ju = a.ncols.min(jl + ncp);
            writeln!(f)?;
            pad_left(f, "", rfw)?;
            for j in jl..ju {
                pad_left(f, &(j + b).to_string(), cw)?;
            }
            writeln!(f)?;
            for i in 0..a.nrows {
                pad_left(f, &(i + b).to_string(), rfw)?;
                for j in jl..ju {
                    let z = a[(i, j)];
                    if real {
                        f.write_str(&e_format(z.re, o.width, o.digits))?;
                    } else {
                        f.write_str(&z_format(z, o.width, o.digits))?;
                    }
                }
                writeln!(f)?;
            }
            jl = ju;
        }
        Ok(())
    }
}

impl fmt::Display for Formatted<'_, DiagMatrix> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.m;
        let o = &self.opts;
        let b = d.base().offset();
        let cw = o.complex_width();
        let ncp = (o.page_width / cw).max(1);
        let n = d.order();

        let mut jl = 0;
        while jl < n {
            let ju = n.min(jl + ncp);
            writeln!(f)?;
            for j in jl..ju {
                pad_left(f, &(j + b).to_string(), cw)?;
            }
            writeln!(f)?;
            for j in jl..ju {
                f.write_str(&z_format(d.get0(j), o.width, o.digits))?;
            }
            writeln!(f)?;
            jl = ju;
        }
        Ok(())
    }
}

impl fmt::Display for ZMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.display_with(FormatOptions::default()), f)
    }
}

impl fmt::Display for DiagMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.display_with(FormatOptions::default()), f)
    }
}
