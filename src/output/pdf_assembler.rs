//! Multi-page PDF assembly
//!
//! Each accepted image becomes one page whose MediaBox matches the image's
//! pixel dimensions (one pixel per point), with the image drawn full-page.

use image::codecs::jpeg::JpegEncoder;
use indicatif::ProgressBar;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::AssembleError;
use crate::core::job::PageEncoding;
use crate::core::validator::AcceptedImage;

const PDF_VERSION: &str = "1.5";
const IMAGE_NAME: &str = "Im0";

/// What [`assemble_pdf`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssembleOutcome {
    /// Nothing to write; no file was created
    NoImages,
    Written { path: PathBuf, pages: usize },
}

/// Write the accepted images to `output` as one PDF
///
/// # Arguments
/// * `images` - Accepted images in page order (consumed)
/// * `output` - Destination file; parent directories are created
/// * `encoding` - How page images are stored
/// * `progress` - Advanced once per encoded page
pub fn assemble_pdf(
    images: Vec<AcceptedImage>,
    output: &Path,
    encoding: PageEncoding,
    progress: &ProgressBar,
) -> Result<AssembleOutcome, AssembleError> {
    if images.is_empty() {
        tracing::info!("No qualifying images found");
        return Ok(AssembleOutcome::NoImages);
    }

    let pages = images.len();
    progress.set_length(pages as u64);
    let mut doc = render_document_with_progress(&images, encoding, progress)?;
    drop(images);

    // Serialize fully in memory so an interrupted run never leaves a partial file
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).map_err(AssembleError::Serialize)?;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| AssembleError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    fs::write(output, &buffer).map_err(|source| AssembleError::Io {
        path: output.to_path_buf(),
        source,
    })?;

    tracing::info!("Wrote {} page(s) to {}", pages, output.display());
    Ok(AssembleOutcome::Written {
        path: output.to_path_buf(),
        pages,
    })
}

/// Build the in-memory PDF document for a list of images
pub fn render_document(
    images: &[AcceptedImage],
    encoding: PageEncoding,
) -> Result<Document, AssembleError> {
    render_document_with_progress(images, encoding, &ProgressBar::hidden())
}

fn render_document_with_progress(
    images: &[AcceptedImage],
    encoding: PageEncoding,
    progress: &ProgressBar,
) -> Result<Document, AssembleError> {
    let mut doc = Document::with_version(PDF_VERSION);
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::with_capacity(images.len());
    for (idx, image) in images.iter().enumerate() {
        let page_id = add_page(&mut doc, pages_id, image, idx + 1, encoding)?;
        kids.push(page_id.into());
        progress.inc(1);
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Count" => kids.len() as i64,
        "Kids" => kids,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    // Only the raw (lossless) image streams and content streams get deflated
    doc.compress();
    Ok(doc)
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    image: &AcceptedImage,
    page: usize,
    encoding: PageEncoding,
) -> Result<ObjectId, AssembleError> {
    let (width, height) = image.dimensions();
    let image_id = doc.add_object(image_stream(image, page, encoding)?);

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Integer(width as i64),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(height as i64),
                    Object::Integer(0),
                    Object::Integer(0),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_NAME.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let media_box: Vec<Object> = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(width as i64),
        Object::Integer(height as i64),
    ];

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => media_box,
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! {
                IMAGE_NAME => image_id,
            },
        },
    });
    Ok(page_id)
}

fn image_stream(
    image: &AcceptedImage,
    page: usize,
    encoding: PageEncoding,
) -> Result<Stream, AssembleError> {
    let (width, height) = image.dimensions();
    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width as i64,
        "Height" => height as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8i64,
    };

    let stream = match encoding {
        PageEncoding::Jpeg { quality } => {
            let mut jpeg = Vec::new();
            JpegEncoder::new_with_quality(&mut jpeg, quality.clamp(1, 100))
                .encode_image(&image.image)
                .map_err(|source| AssembleError::Encode {
                    page,
                    path: image.path.clone(),
                    source,
                })?;
            dict.set("Filter", "DCTDecode");
            // Already compressed; keep Document::compress away from it
            Stream::new(dict, jpeg).with_compression(false)
        }
        PageEncoding::Lossless => Stream::new(dict, image.image.as_raw().clone()),
    };
    Ok(stream)
}
