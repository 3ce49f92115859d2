//! DICOM data dumping library
//!
//! This is a helper library
//! for dumping the contents of DICOM objects and decoded image frames
//! in a human readable way.
//!
//! # Examples
//!
//! A quick and easy way to dump the contents of a DICOM file
//! is via [`dump_file`]
//! (or [`dump_file_to`] to print to an arbitrary writer).
//!
//! ```no_run
//! use dicom_lite_object::open_file;
//! use dicom_lite_dump::dump_file;
//!
//! let obj = open_file("path/to/file.dcm")?;
//! dump_file(&obj)?;
//! # Result::<(), Box<dyn std::error::Error>>::Ok(())
//! ```
//!
//! See the [`DumpOptions`] builder for additional dumping options.
//!
//! ```no_run
//! use dicom_lite_object::open_file;
//! use dicom_lite_dump::DumpOptions;
//!
//! let obj = open_file("path/to/file2.dcm")?;
//! let mut options = DumpOptions::new();
//! // dump to stdout (width = 100), without the items of nested sequences
//! options.width(100).max_depth(0).dump_file(&obj)?;
//! # Result::<(), Box<dyn std::error::Error>>::Ok(())
//! ```
use dicom_lite_core::dictionary::{DataDictionary, DataDictionaryEntry};
use dicom_lite_core::header::{HasLength, Header};
use dicom_lite_core::value::{PrimitiveValue, Value as DicomValue};
use dicom_lite_core::VR;
use dicom_lite_object::mem::{InMemDicomObject, InMemElement};
use dicom_lite_object::{FileDicomObject, FileMetaTable, StandardDataDictionary};
use dicom_lite_pixeldata::ImageFrame;
use owo_colors::*;
use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};
use std::io::{stdout, Result as IoResult, Write};
use std::str::FromStr;

/// Options and flags to configure how to dump a DICOM file or object.
///
/// This is a builder which exposes the various options available
/// for printing the contents of the DICOM file in a readable way.
///
/// Once set up,
/// the [`dump_file`] or [`dump_file_to`] methods can be used
/// to finalize the DICOM data dumping process on an open file.
/// Both file meta table and main data set are dumped.
/// Alternatively,
/// [`dump_object`] or [`dump_object_to`] methods
/// work on bare DICOM objects without a file meta table.
///
/// [`dump_file`]: DumpOptions::dump_file
/// [`dump_file_to`]: DumpOptions::dump_file_to
/// [`dump_object`]: DumpOptions::dump_object
/// [`dump_object_to`]: DumpOptions::dump_object_to
///
/// # Example
///
/// ```no_run
/// use dicom_lite_object::open_file;
/// use dicom_lite_dump::{ColorMode, DumpOptions};
///
/// let my_dicom_file = open_file("/path_to_file")?;
/// let mut options = DumpOptions::new();
/// options
///     // maximum 120 characters per line
///     .width(120)
///     // no limit for text values
///     .no_text_limit(true)
///     // never print colored output
///     .color_mode(ColorMode::Never)
///     // dump to stdout
///     .dump_file(&my_dicom_file)?;
/// # Result::<(), Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
#[non_exhaustive]
pub struct DumpOptions {
    /// whether to produce colored output
    pub color: ColorMode,
    /// the console width to assume when trimming long values
    pub width: Option<u32>,
    /// never trim out long text values
    pub no_text_limit: bool,
    /// never trim out any values (implies `no_text_limit`)
    pub no_limit: bool,
    /// the number of sequence levels whose items are printed
    /// (no limit by default)
    pub max_depth: Option<u32>,
}

impl DumpOptions {
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the maximum output width in number of characters.
    ///
    /// The methods [`dump_file_to`](DumpOptions::dump_file_to)
    /// and [`dump_object_to`](DumpOptions::dump_object_to),
    /// will print everything to the end,
    /// regardless of this option.
    pub fn width(&mut self, width: u32) -> &mut Self {
        self.width = Some(width);
        self
    }

    /// Set the maximum output width to automatic,
    /// based on terminal size.
    ///
    /// This is the default behavior.
    /// If a terminal width could not be determined,
    /// the default width of 120 characters is used.
    pub fn width_auto(&mut self) -> &mut Self {
        self.width = None;
        self
    }

    /// Set whether to remove the maximum width restriction for text values.
    pub fn no_text_limit(&mut self, no_text_limit: bool) -> &mut Self {
        self.no_text_limit = no_text_limit;
        self
    }

    /// Set whether to remove the maximum width restriction
    /// for all DICOM values.
    pub fn no_limit(&mut self, no_limit: bool) -> &mut Self {
        self.no_limit = no_limit;
        self
    }

    /// Set how many levels of nested sequences have their items printed.
    ///
    /// With a depth of 0,
    /// only the number of items of each root level sequence is shown.
    pub fn max_depth(&mut self, max_depth: u32) -> &mut Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Set the output color mode.
    pub fn color_mode(&mut self, color: ColorMode) -> &mut Self {
        self.color = color;
        self
    }

    /// Dump the contents of an open DICOM file to standard output.
    pub fn dump_file<D>(&self, obj: &FileDicomObject<InMemDicomObject<D>>) -> IoResult<()>
    where
        D: DataDictionary + Clone,
    {
        self.dump_file_impl(stdout(), obj, true)
    }

    /// Dump the contents of an open DICOM file to the given writer.
    pub fn dump_file_to<D>(
        &self,
        to: impl Write,
        obj: &FileDicomObject<InMemDicomObject<D>>,
    ) -> IoResult<()>
    where
        D: DataDictionary + Clone,
    {
        self.dump_file_impl(to, obj, false)
    }

    fn dump_file_impl<D>(
        &self,
        mut to: impl Write,
        obj: &FileDicomObject<InMemDicomObject<D>>,
        to_stdout: bool,
    ) -> IoResult<()>
    where
        D: DataDictionary + Clone,
    {
        self.set_color_override(to_stdout);
        let settings = self.settings(to_stdout);

        meta_dump(
            &mut to,
            obj.meta(),
            if settings.no_limit {
                u32::MAX
            } else {
                settings.width
            },
        )?;

        writeln!(to, "{:-<58}", "")?;

        // meta group elements were already printed in the table above
        for elem in obj.iter().filter(|e| e.tag().group() != 0x0002) {
            dump_element(&mut to, elem, &settings, 0, 0)?;
        }

        Ok(())
    }

    /// Dump the contents of a DICOM object to standard output.
    #[inline]
    pub fn dump_object<D>(&self, obj: &InMemDicomObject<D>) -> IoResult<()>
    where
        D: DataDictionary + Clone,
    {
        self.dump_object_impl(stdout(), obj, true)
    }

    /// Dump the contents of a DICOM object to the given writer.
    #[inline]
    pub fn dump_object_to<D>(&self, to: impl Write, obj: &InMemDicomObject<D>) -> IoResult<()>
    where
        D: DataDictionary + Clone,
    {
        self.dump_object_impl(to, obj, false)
    }

    fn dump_object_impl<D>(
        &self,
        mut to: impl Write,
        obj: &InMemDicomObject<D>,
        to_stdout: bool,
    ) -> IoResult<()>
    where
        D: DataDictionary + Clone,
    {
        self.set_color_override(to_stdout);
        let settings = self.settings(to_stdout);
        dump(&mut to, obj, &settings, 0, 0)
    }

    fn set_color_override(&self, to_stdout: bool) {
        match (self.color, to_stdout) {
            (ColorMode::Never, _) => owo_colors::set_override(false),
            (ColorMode::Always, _) => owo_colors::set_override(true),
            (ColorMode::Auto, false) => owo_colors::set_override(false),
            (ColorMode::Auto, true) => owo_colors::unset_override(),
        }
    }

    fn settings(&self, to_stdout: bool) -> Settings {
        let (no_text_limit, no_limit) = if to_stdout {
            (self.no_text_limit, self.no_limit)
        } else {
            (true, true)
        };
        Settings {
            width: determine_width(self.width),
            no_text_limit,
            no_limit,
            max_depth: self.max_depth,
        }
    }
}

/// The resolved options of a single dump.
#[derive(Debug, Copy, Clone)]
struct Settings {
    width: u32,
    no_text_limit: bool,
    no_limit: bool,
    max_depth: Option<u32>,
}

/// Enumeration of output coloring modes.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub enum ColorMode {
    /// Produce colored output if supported by the destination
    /// (namely, if the destination is a terminal).
    /// When calling [`dump_file_to`](DumpOptions::dump_file_to)
    /// or [`dump_object_to`](DumpOptions::dump_object_to),
    /// the output will not be colored.
    ///
    /// This is the default behavior.
    #[default]
    Auto,
    /// Never produce colored output.
    Never,
    /// Always produce colored output.
    Always,
}

impl Display for ColorMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ColorMode::Never => f.write_str("never"),
            ColorMode::Auto => f.write_str("auto"),
            ColorMode::Always => f.write_str("always"),
        }
    }
}

impl FromStr for ColorMode {
    type Err = ColorModeError;
    fn from_str(color: &str) -> Result<Self, Self::Err> {
        match color {
            "never" => Ok(ColorMode::Never),
            "auto" => Ok(ColorMode::Auto),
            "always" => Ok(ColorMode::Always),
            _ => Err(ColorModeError),
        }
    }
}

/// The error raised when providing an invalid color mode.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub struct ColorModeError;

impl Display for ColorModeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("invalid color mode")
    }
}

impl std::error::Error for ColorModeError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DumpValue<T>
where
    T: ToString,
{
    TagNum(T),
    Alias(T),
    Num(T),
    Str(T),
    Nothing,
}

impl<T> Display for DumpValue<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        fn write_value_with_width(value: impl Display, f: &mut Formatter) -> fmt::Result {
            if let Some(width) = f.width() {
                write!(f, "{:width$}", value, width = width)
            } else {
                write!(f, "{}", value)
            }
        }

        match self {
            DumpValue::TagNum(v) => {
                let value = v.if_supports_color(Stream::Stdout, |v| v.dimmed());
                write_value_with_width(value, f)
            }
            DumpValue::Alias(v) => {
                let value = v.if_supports_color(Stream::Stdout, |v| v.bold());
                write_value_with_width(value, f)
            }
            DumpValue::Num(v) => {
                let value = v.if_supports_color(Stream::Stdout, |v| v.cyan());
                write_value_with_width(value, f)
            }
            DumpValue::Str(v) => {
                let value = v.if_supports_color(Stream::Stdout, |v| v.yellow());
                write_value_with_width(value, f)
            }
            DumpValue::Nothing => {
                let value = "(no value)".if_supports_color(Stream::Stdout, |v| v.italic());
                write_value_with_width(value, f)
            }
        }
    }
}

/// Dump the contents of a DICOM file to stdout.
///
/// Both file meta table and main data set are dumped.
pub fn dump_file<D>(obj: &FileDicomObject<InMemDicomObject<D>>) -> IoResult<()>
where
    D: DataDictionary + Clone,
{
    DumpOptions::new().dump_file(obj)
}

/// Dump the contents of a DICOM file to the given writer.
///
/// Both file meta table and main data set are dumped.
pub fn dump_file_to<D>(to: impl Write, obj: &FileDicomObject<InMemDicomObject<D>>) -> IoResult<()>
where
    D: DataDictionary + Clone,
{
    DumpOptions::new().dump_file_to(to, obj)
}

/// Dump the contents of a DICOM object to stdout.
pub fn dump_object<D>(obj: &InMemDicomObject<D>) -> IoResult<()>
where
    D: DataDictionary + Clone,
{
    DumpOptions::new().dump_object(obj)
}

/// Dump the contents of a DICOM object to the given writer.
pub fn dump_object_to<D>(to: impl Write, obj: &InMemDicomObject<D>) -> IoResult<()>
where
    D: DataDictionary + Clone,
{
    DumpOptions::new().dump_object_to(to, obj)
}

/// Dump a summary of a decoded image frame to the given writer:
/// its dimensions, bit depth, sample range
/// and the first `pixels` samples.
pub fn dump_frame_to(
    mut to: impl Write,
    frame_index: u32,
    frame: &ImageFrame,
    pixels: usize,
) -> IoResult<()> {
    writeln!(
        to,
        "{}: {}x{}x{}, {}-bit",
        format!("Frame #{}", frame_index).if_supports_color(Stream::Stdout, |v| v.bold()),
        frame.width,
        frame.height,
        frame.samples_per_pixel,
        frame.bit_depth,
    )?;
    match frame.min_max() {
        Some((min, max)) => writeln!(
            to,
            "{}: {} .. {}",
            "Sample range".if_supports_color(Stream::Stdout, |v| v.bold()),
            DumpValue::Num(min),
            DumpValue::Num(max),
        )?,
        None => writeln!(
            to,
            "{}: {}",
            "Sample range".if_supports_color(Stream::Stdout, |v| v.bold()),
            DumpValue::<&str>::Nothing,
        )?,
    }
    if pixels > 0 {
        let shown = &frame.pixels[..pixels.min(frame.pixels.len())];
        writeln!(
            to,
            "{}: {}",
            format!("First {} samples", shown.len()).if_supports_color(Stream::Stdout, |v| v.bold()),
            DumpValue::Num(format_value_list(shown, None, false)),
        )?;
    }
    Ok(())
}

#[inline]
fn whitespace_or_null(c: char) -> bool {
    c.is_whitespace() || c == '\0'
}

fn meta_dump<W>(to: &mut W, meta: &FileMetaTable, width: u32) -> IoResult<()>
where
    W: ?Sized + Write,
{
    let mut line = |title: &str, value: &str| -> IoResult<()> {
        writeln!(
            to,
            "{}: {}",
            title.if_supports_color(Stream::Stdout, |v| v.bold()),
            cut_str(value, width),
        )
    };

    if let Some(uid) = meta.media_storage_sop_class_uid() {
        line("Media Storage SOP Class UID", uid)?;
    }
    if let Some(uid) = meta.media_storage_sop_instance_uid() {
        line("Media Storage SOP Instance UID", uid)?;
    }
    match dicom_lite_transfer_syntax_registry::get(meta.transfer_syntax()) {
        Some(ts) => line(
            "Transfer Syntax",
            &format!("{} ({})", ts.uid(), ts.name()),
        )?,
        None => line(
            "Transfer Syntax",
            &format!("{} («UNKNOWN»)", meta.transfer_syntax()),
        )?,
    }
    if let Some(uid) = meta.implementation_class_uid() {
        line("Implementation Class UID", uid)?;
    }
    if let Some(v) = meta.implementation_version_name.as_ref() {
        line("Implementation version name", v.trim_end_matches(whitespace_or_null))?;
    }
    if let Some(v) = meta.source_application_entity_title.as_ref() {
        line(
            "Source Application Entity Title",
            v.trim_end_matches(whitespace_or_null),
        )?;
    }
    if let Some(v) = meta.sending_application_entity_title.as_ref() {
        line(
            "Sending Application Entity Title",
            v.trim_end_matches(whitespace_or_null),
        )?;
    }
    if let Some(v) = meta.receiving_application_entity_title.as_ref() {
        line(
            "Receiving Application Entity Title",
            v.trim_end_matches(whitespace_or_null),
        )?;
    }

    writeln!(to)?;
    Ok(())
}

fn dump<W, D>(
    to: &mut W,
    obj: &InMemDicomObject<D>,
    settings: &Settings,
    depth: u32,
    sequence_level: u32,
) -> IoResult<()>
where
    W: ?Sized + Write,
    D: DataDictionary + Clone,
{
    for elem in obj {
        dump_element(&mut *to, elem, settings, depth, sequence_level)?;
    }

    Ok(())
}

fn dump_element<W, D>(
    to: &mut W,
    elem: &InMemElement<D>,
    settings: &Settings,
    depth: u32,
    sequence_level: u32,
) -> IoResult<()>
where
    W: ?Sized + Write,
    D: DataDictionary + Clone,
{
    let indent = "  ".repeat(depth as usize);
    let tag_alias = StandardDataDictionary
        .by_tag(elem.tag())
        .map(DataDictionaryEntry::alias)
        .unwrap_or("«Unknown Attribute»");
    let vm = match elem.vr() {
        VR::OB | VR::OD | VR::OF | VR::OL | VR::OV | VR::OW | VR::UN => 1,
        _ => elem.value().multiplicity(),
    };
    let max_width = |offset: u32| {
        Some(settings.width)
            .filter(|_| !settings.no_limit)
            .map(|w| w.saturating_sub(offset + depth * 2))
    };

    to.write_all(indent.as_bytes())?;
    match elem.value() {
        DicomValue::Sequence(seq) => {
            writeln!(
                to,
                "{} {:28} {} ({} Item{})",
                DumpValue::TagNum(elem.tag()),
                DumpValue::Alias(tag_alias),
                elem.vr(),
                vm,
                if vm == 1 { "" } else { "s" },
            )?;
            if settings.max_depth.map_or(true, |max| sequence_level < max) {
                for item in seq.items() {
                    dump_item(&mut *to, item, settings, depth + 1, sequence_level + 1)?;
                }
            } else if !seq.items().is_empty() {
                writeln!(
                    to,
                    "{}  {}",
                    indent,
                    "(items not shown)".if_supports_color(Stream::Stdout, |v| v.italic()),
                )?;
            }
            writeln!(
                to,
                "{}{} {}",
                indent,
                DumpValue::TagNum("(FFFE,E0DD)"),
                DumpValue::Alias("SequenceDelimitationItem"),
            )?;
        }
        DicomValue::PixelSequence(seq) => {
            let num_items = 1 + seq.fragments().len();
            writeln!(
                to,
                "{} {:28} {} (PixelSequence, {} Item{})",
                DumpValue::TagNum(elem.tag()),
                DumpValue::Alias("PixelData"),
                elem.vr(),
                num_items,
                if num_items == 1 { "" } else { "s" },
            )?;

            let offset_table = seq.offset_table();
            writeln!(
                to,
                "{}  {} offset table ({:>2}, {:>2} bytes): {}",
                indent,
                DumpValue::TagNum("(FFFE,E000)"),
                offset_table.len(),
                offset_table.len() * 4,
                offset_table_summary(offset_table, max_width(38)),
            )?;

            for fragment in seq.fragments() {
                writeln!(
                    to,
                    "{}  {} pi ({:>3} bytes): {}",
                    indent,
                    DumpValue::TagNum("(FFFE,E000)"),
                    fragment.len(),
                    item_value_summary(fragment, max_width(38)),
                )?;
            }
            writeln!(
                to,
                "{}{} {}",
                indent,
                DumpValue::TagNum("(FFFE,E0DD)"),
                DumpValue::Alias("SequenceDelimitationItem"),
            )?;
        }
        DicomValue::Primitive(value) => {
            let vr = elem.vr();
            let byte_len = elem.length().0;
            writeln!(
                to,
                "{} {:28} {} ({},{:>3} bytes): {}",
                DumpValue::TagNum(elem.tag()),
                DumpValue::Alias(tag_alias),
                vr,
                vm,
                byte_len,
                value_summary(
                    value,
                    vr,
                    settings.width.saturating_sub(63 + depth * 2),
                    settings.no_text_limit,
                    settings.no_limit,
                ),
            )?;
        }
    }

    Ok(())
}

fn dump_item<W, D>(
    to: &mut W,
    item: &InMemDicomObject<D>,
    settings: &Settings,
    depth: u32,
    sequence_level: u32,
) -> IoResult<()>
where
    W: ?Sized + Write,
    D: DataDictionary + Clone,
{
    let indent = "  ".repeat(depth as usize);
    writeln!(
        to,
        "{}{} na {}",
        indent,
        DumpValue::TagNum("(FFFE,E000)"),
        DumpValue::Alias("Item"),
    )?;
    dump(to, item, settings, depth + 1, sequence_level)?;
    writeln!(
        to,
        "{}{} {}",
        indent,
        DumpValue::TagNum("(FFFE,E00D)"),
        DumpValue::Alias("ItemDelimitationItem"),
    )?;
    Ok(())
}

fn value_summary(
    value: &PrimitiveValue,
    vr: VR,
    max_characters: u32,
    no_text_limit: bool,
    no_limit: bool,
) -> DumpValue<String> {
    use PrimitiveValue::*;

    let max_characters = match (no_limit, no_text_limit) {
        (true, _) => None,
        (false, true) if vr.is_textual() => None,
        (false, _) => Some(max_characters),
    };
    match value {
        F32(values) => DumpValue::Num(format_value_list(values, max_characters, false)),
        F64(values) => DumpValue::Num(format_value_list(values, max_characters, false)),
        I32(values) => DumpValue::Num(format_value_list(values, max_characters, false)),
        I64(values) => DumpValue::Num(format_value_list(values, max_characters, false)),
        U32(values) => DumpValue::Num(format_value_list(values, max_characters, false)),
        U64(values) => DumpValue::Num(format_value_list(values, max_characters, false)),
        I16(values) => DumpValue::Num(format_value_list(values, max_characters, false)),
        U16(values) => DumpValue::Num(format_value_list(values, max_characters, false)),
        // binary values are kept as raw bytes
        U8(values) => DumpValue::Num(format_value_list(
            values.iter().map(|n| format!("{:02X}", n)),
            max_characters,
            false,
        )),
        Tags(values) => DumpValue::Str(format_value_list(values, max_characters, false)),
        Strs(values) => DumpValue::Str(format_value_list(
            values
                .iter()
                .map(|s| s.trim_end_matches(whitespace_or_null)),
            max_characters,
            true,
        )),
        Str(value) => {
            let txt = format!(
                "\"{}\"",
                sanitize(value.trim_end_matches(whitespace_or_null))
            );
            if let Some(max) = max_characters {
                DumpValue::Str(cut_str(&txt, max).into_owned())
            } else {
                DumpValue::Str(txt)
            }
        }
        Empty => DumpValue::Nothing,
    }
}

fn sanitize(text: &str) -> String {
    text.replace('\n', "␊")
        .replace('\r', "␍")
        .replace('\0', "␀")
        .replace(|c: char| c.is_control(), "�")
}

fn item_value_summary(data: &[u8], max_characters: Option<u32>) -> DumpValue<String> {
    DumpValue::Num(format_value_list(
        data.iter().map(|n| format!("{:02X}", n)),
        max_characters,
        false,
    ))
}

fn offset_table_summary(data: &[u32], max_characters: Option<u32>) -> String {
    if data.is_empty() {
        format!("{}", "(empty)".if_supports_color(Stream::Stdout, |v| v.italic()))
    } else {
        format_value_list(
            data.iter().map(|n| format!("{:04X}", n)),
            max_characters,
            false,
        )
    }
}

fn format_value_list<I>(values: I, max_characters: Option<u32>, quoted: bool) -> String
where
    I: IntoIterator,
    I::IntoIter: ExactSizeIterator,
    I::Item: Display,
{
    let values = values.into_iter();
    let len = values.len();
    let mut acc_size = 0;
    let mut pieces = String::new();
    if len > 1 {
        pieces.push('[');
    }
    for piece in values {
        let mut piece = sanitize(&piece.to_string());

        if acc_size > 0 {
            pieces.push_str(", ");
        }

        if quoted {
            piece = piece.replace('\"', "\\\"");
            pieces.push('"');
        }

        acc_size += piece.len();
        pieces.push_str(&piece);
        if quoted {
            pieces.push('"');
        }
        // stop earlier if applicable
        if max_characters
            .filter(|max| (*max as usize) < acc_size)
            .is_some()
        {
            break;
        }
    }
    if len > 1 {
        pieces.push(']');
    }
    if let Some(max_characters) = max_characters {
        cut_str(&pieces, max_characters).into_owned()
    } else {
        pieces
    }
}

fn cut_str(s: &str, max_characters: u32) -> Cow<str> {
    let max = (max_characters.saturating_sub(3)) as usize;
    let len = s.chars().count();

    if len > max {
        s.chars()
            .take(max)
            .chain("...".chars())
            .collect::<String>()
            .into()
    } else {
        s.into()
    }
}

fn determine_width(user_width: Option<u32>) -> u32 {
    user_width
        .or_else(|| terminal_size::terminal_size().map(|(width, _)| width.0 as u32))
        .unwrap_or(120)
}

#[cfg(test)]
mod tests {
    use dicom_lite_core::header::DataElementHeader;
    use dicom_lite_core::value::{DataSetSequence, Value};
    use dicom_lite_core::{DataElement, Length, PrimitiveValue, Tag, VR};
    use dicom_lite_dictionary_std::tags;
    use dicom_lite_object::{FileMetaTableBuilder, InMemDicomObject, InMemElement};
    use dicom_lite_pixeldata::ImageFrame;

    use super::{meta_dump, whitespace_or_null};
    use crate::{dump_frame_to, ColorMode, DumpOptions};

    fn text(tag: Tag, vr: VR, value: &str) -> InMemElement {
        DataElement::new(
            DataElementHeader::new(tag, vr, Length(value.len() as u32)),
            Value::Primitive(PrimitiveValue::Strs(
                value.split('\\').map(String::from).collect(),
            )),
        )
    }

    fn us(tag: Tag, value: u16) -> InMemElement {
        DataElement::new(
            DataElementHeader::new(tag, VR::US, Length(2)),
            Value::Primitive(PrimitiveValue::new_u16(value)),
        )
    }

    fn lines(out: &[u8]) -> Vec<&str> {
        std::str::from_utf8(out)
            .expect("output is not valid UTF-8")
            .split('\n')
            .collect()
    }

    fn check_line(line: &str, expected: (&str, &str, &str, &str)) {
        let parts: Vec<&str> = line.split(' ').filter(|p| !p.is_empty()).collect();
        let value = line.splitn(2, ": ").nth(1).unwrap().trim();
        assert_eq!(&parts[..3], &[expected.0, expected.1, expected.2]);
        assert_eq!(value, expected.3);
    }

    #[test]
    fn trims_all_whitespace() {
        assert_eq!("   ".trim_end_matches(whitespace_or_null), "");
        assert_eq!("\0".trim_end_matches(whitespace_or_null), "");
        assert_eq!("1.4.5.6\0".trim_end_matches(whitespace_or_null), "1.4.5.6");
        assert_eq!("AETITLE ".trim_end_matches(whitespace_or_null), "AETITLE");
    }

    #[test]
    fn meta_dump_covers_properties() {
        let meta = FileMetaTableBuilder::new()
            // Explicit VR Little Endian
            .transfer_syntax("1.2.840.10008.1.2.1\0")
            .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.7")
            .media_storage_sop_instance_uid("1.2.888.123")
            .implementation_class_uid("1.2.345.6")
            .build()
            .unwrap();

        owo_colors::set_override(false);
        let mut out = Vec::new();
        meta_dump(&mut out, &meta, 120).unwrap();
        let lines = lines(&out);

        assert_eq!(
            lines[0],
            "Media Storage SOP Class UID: 1.2.840.10008.5.1.4.1.1.7"
        );
        assert_eq!(lines[1], "Media Storage SOP Instance UID: 1.2.888.123");
        assert_eq!(
            lines[2],
            "Transfer Syntax: 1.2.840.10008.1.2.1 (Explicit VR Little Endian)"
        );
        assert_eq!(lines[3], "Implementation Class UID: 1.2.345.6");
        assert_eq!(lines[4], "");
    }

    #[test]
    fn meta_dump_flags_unknown_transfer_syntax() {
        let meta = FileMetaTableBuilder::new()
            .transfer_syntax("1.2.3.4")
            .build()
            .unwrap();

        owo_colors::set_override(false);
        let mut out = Vec::new();
        meta_dump(&mut out, &meta, 120).unwrap();
        assert_eq!(lines(&out)[0], "Transfer Syntax: 1.2.3.4 («UNKNOWN»)");
    }

    #[test]
    fn dump_object_to_covers_properties() {
        let obj = InMemDicomObject::from_element_iter(vec![
            text(tags::IMAGE_TYPE, VR::CS, "ORIGINAL\\PRIMARY"),
            text(tags::SOP_INSTANCE_UID, VR::UI, "1.2.888.123\0"),
            DataElement::empty(tags::CONTENT_DATE, VR::DA),
            text(tags::MODALITY, VR::CS, "OT"),
            text(tags::INSTITUTION_NAME, VR::LO, "Hospital\nWest Wing"),
            us(tags::SAMPLES_PER_PIXEL, 3),
        ]);

        let mut out = Vec::new();
        DumpOptions::new()
            .color_mode(ColorMode::Never)
            .dump_object_to(&mut out, &obj)
            .unwrap();
        let lines = lines(&out);

        check_line(
            lines[0],
            ("(0008,0008)", "ImageType", "CS", "[\"ORIGINAL\", \"PRIMARY\"]"),
        );
        check_line(
            lines[1],
            ("(0008,0018)", "SOPInstanceUID", "UI", "\"1.2.888.123\""),
        );
        check_line(lines[2], ("(0008,0023)", "ContentDate", "DA", "(no value)"));
        check_line(lines[3], ("(0008,0060)", "Modality", "CS", "\"OT\""));
        check_line(
            lines[4],
            (
                "(0008,0080)",
                "InstitutionName",
                "LO",
                "\"Hospital␊West Wing\"",
            ),
        );
        check_line(lines[5], ("(0028,0002)", "SamplesPerPixel", "US", "3"));
    }

    fn object_with_sequence() -> InMemDicomObject {
        let item = InMemDicomObject::from_element_iter(vec![text(
            tags::REFERENCED_SOP_INSTANCE_UID,
            VR::UI,
            "1.2.3",
        )]);
        InMemDicomObject::from_element_iter(vec![
            DataElement::new(
                DataElementHeader::new(tags::REFERENCED_IMAGE_SEQUENCE, VR::SQ, Length::UNDEFINED),
                Value::Sequence(DataSetSequence::new(vec![item], Length::UNDEFINED)),
            ),
            text(tags::PATIENT_NAME, VR::PN, "Doe^John"),
        ])
    }

    #[test]
    fn dump_nested_items() {
        let mut out = Vec::new();
        DumpOptions::new()
            .color_mode(ColorMode::Never)
            .dump_object_to(&mut out, &object_with_sequence())
            .unwrap();
        let lines = lines(&out);

        assert!(lines[0].starts_with("(0008,1140) ReferencedImageSequence"));
        assert!(lines[0].ends_with("SQ (1 Item)"));
        assert_eq!(lines[1].trim(), "(FFFE,E000) na Item");
        assert!(lines[2].starts_with("    (0008,1155) ReferencedSOPInstanceUID"));
        assert_eq!(lines[3].trim(), "(FFFE,E00D) ItemDelimitationItem");
        assert_eq!(lines[4], "(FFFE,E0DD) SequenceDelimitationItem");
        check_line(lines[5], ("(0010,0010)", "PatientName", "PN", "\"Doe^John\""));
    }

    #[test]
    fn max_depth_hides_nested_items() {
        let mut out = Vec::new();
        DumpOptions::new()
            .color_mode(ColorMode::Never)
            .max_depth(0)
            .dump_object_to(&mut out, &object_with_sequence())
            .unwrap();
        let lines = lines(&out);

        assert!(lines[0].starts_with("(0008,1140) ReferencedImageSequence"));
        assert_eq!(lines[1].trim(), "(items not shown)");
        assert_eq!(lines[2], "(FFFE,E0DD) SequenceDelimitationItem");
        assert!(lines[3].starts_with("(0010,0010) PatientName"));
    }

    #[test]
    fn dump_frame_summary() {
        let frame = ImageFrame {
            width: 2,
            height: 2,
            bit_depth: 12,
            samples_per_pixel: 1,
            pixels: vec![7, 4095, 0, 12],
        };

        owo_colors::set_override(false);
        let mut out = Vec::new();
        dump_frame_to(&mut out, 0, &frame, 3).unwrap();
        let lines = lines(&out);

        assert_eq!(lines[0], "Frame #0: 2x2x1, 12-bit");
        assert_eq!(lines[1], "Sample range: 0 .. 4095");
        assert_eq!(lines[2], "First 3 samples: [7, 4095, 0]");

        let mut out = Vec::new();
        dump_frame_to(&mut out, 1, &frame, 0).unwrap();
        assert_eq!(
            std::str::from_utf8(&out).unwrap(),
            "Frame #1: 2x2x1, 12-bit\nSample range: 0 .. 4095\n"
        );
    }
}
