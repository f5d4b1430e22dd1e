// MIT LICENSE
//
// Copyright (c) 2021 Dash Core Group
//
// Permission is hereby granted, free of charge, to any
// person obtaining a copy of this software and associated
// documentation files (the "Software"), to deal in the
// Software without restriction, including without
// limitation the rights to use, copy, modify, merge,
// publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software
// is furnished to do so, subject to the following
// conditions:
//
// The above copyright notice and this permission notice
// shall be included in all copies or substantial portions
// of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF
// ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED
// TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A
// PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT
// SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY
// CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR
// IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
// DEALINGS IN THE SOFTWARE.

//! Indented, hex-abbreviated dumps of digests, trees and proofs.

use core::fmt;
use std::io::{Result, Write};

use itertools::Itertools;

/// Hex characters kept on each side of an abbreviated digest.
const HEX_LEN: usize = 8;
const INDENT_SPACES: usize = 4;

/// Something that can draw itself through a [`Drawer`].
pub trait Visualize {
    /// Write a representation of `self`, returning the drawer for chaining.
    fn visualize<W: Write>(&self, drawer: Drawer<W>) -> Result<Drawer<W>>;
}

/// `Debug` wrapper printing a 32-byte digest as abbreviated hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DebugDigest(pub [u8; 32]);

impl fmt::Debug for DebugDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_hex(&self.0))
    }
}

/// `Debug` wrapper printing a list of digests, one abbreviated hex per entry.
#[derive(Clone, PartialEq, Eq)]
pub struct DebugDigests(pub Vec<[u8; 32]>);

impl fmt::Debug for DebugDigests {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut v = Vec::new();
        visualize_to_vec(&mut v, self.0.as_slice());
        f.write_str(&String::from_utf8_lossy(&v))
    }
}

/// An `io::Write` proxy that indents every new line by the current level.
pub struct Drawer<W: Write> {
    level: usize,
    write: W,
}

impl<W: Write> Drawer<W> {
    /// Start drawing at indentation level zero.
    pub fn new(write: W) -> Self {
        Drawer { level: 0, write }
    }

    /// Indent subsequent lines one level deeper.
    pub fn down(&mut self) {
        self.level += 1;
    }

    /// Undo one [`Drawer::down`].
    pub fn up(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    /// Write `buf`, re-indenting after each `\n`.
    pub fn write(&mut self, buf: &[u8]) -> Result<()> {
        let sep = format!("\n{}", " ".repeat(INDENT_SPACES * self.level));
        let lines = buf.split(|c| *c == b'\n');
        for part in Itertools::intersperse(lines, sep.as_bytes()) {
            self.write.write_all(part)?;
        }
        Ok(())
    }

    /// Terminate the drawing with a newline and flush.
    pub fn flush(&mut self) -> Result<()> {
        self.write.write_all(b"\n")?;
        self.write.flush()
    }
}

/// Hex-encode `bytes`, abbreviating the middle of anything longer than 16
/// hex characters.
pub fn to_hex(bytes: &[u8]) -> String {
    let encoded = hex::encode(bytes);
    let remaining = encoded.len().saturating_sub(HEX_LEN);
    if remaining > HEX_LEN {
        format!("{}..{}", &encoded[..HEX_LEN], &encoded[remaining..])
    } else {
        encoded
    }
}

impl Visualize for [u8; 32] {
    fn visualize<W: Write>(&self, mut drawer: Drawer<W>) -> Result<Drawer<W>> {
        drawer.write(to_hex(self).as_bytes())?;
        Ok(drawer)
    }
}

impl Visualize for [u8] {
    fn visualize<W: Write>(&self, mut drawer: Drawer<W>) -> Result<Drawer<W>> {
        drawer.write(format!("[hex: {}, len: {}]", to_hex(self), self.len()).as_bytes())?;
        Ok(drawer)
    }
}

impl Visualize for Vec<u8> {
    fn visualize<W: Write>(&self, drawer: Drawer<W>) -> Result<Drawer<W>> {
        self.as_slice().visualize(drawer)
    }
}

impl Visualize for [[u8; 32]] {
    fn visualize<W: Write>(&self, mut drawer: Drawer<W>) -> Result<Drawer<W>> {
        drawer.write(b"[")?;
        for (i, digest) in self.iter().enumerate() {
            if i > 0 {
                drawer.write(b", ")?;
            }
            drawer = digest.visualize(drawer)?;
        }
        drawer.write(b"]")?;
        Ok(drawer)
    }
}

impl<T: Visualize + ?Sized> Visualize for &T {
    fn visualize<W: Write>(&self, drawer: Drawer<W>) -> Result<Drawer<W>> {
        (*self).visualize(drawer)
    }
}

impl<T: Visualize> Visualize for Option<T> {
    fn visualize<W: Write>(&self, mut drawer: Drawer<W>) -> Result<Drawer<W>> {
        match self {
            Some(v) => v.visualize(drawer),
            None => {
                drawer.write(b"None")?;
                Ok(drawer)
            }
        }
    }
}

/// Draw `value` straight to stderr.
pub fn visualize_stderr<T: Visualize + ?Sized>(value: &T) {
    let mut out = std::io::stderr();
    let drawer = Drawer::new(&mut out);
    if let Ok(mut drawer) = value.visualize(drawer) {
        let _ = drawer.flush();
    }
}

/// Draw `value` into a growable buffer.
pub fn visualize_to_vec<T: Visualize + ?Sized>(v: &mut Vec<u8>, value: &T) {
    let drawer = Drawer::new(v);
    // Writing into a Vec cannot fail.
    let _ = value.visualize(drawer);
}

/// Draw `value` into a `String`.
pub fn visualize_to_string<T: Visualize + ?Sized>(value: &T) -> String {
    let mut v = Vec::new();
    visualize_to_vec(&mut v, value);
    String::from_utf8_lossy(&v).into_owned()
}
