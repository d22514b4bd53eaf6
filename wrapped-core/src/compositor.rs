use image::{Rgb, RgbImage, imageops};

use crate::{
    AlbumCollection, AlbumEntry, CellPlacement, CoverSource, Fonts, Layout, LayoutConfig,
    Provenance, Resolver, Result, Sleeper, ThreadSleeper,
};

/// Paints the title and one cell per album onto a single canvas.
pub struct Compositor<S, Z = ThreadSleeper> {
    layout: LayoutConfig,
    resolver: Resolver<S, Z>,
    fonts: Fonts,
}
impl<S: CoverSource, Z: Sleeper> Compositor<S, Z> {
    pub fn new(layout: LayoutConfig, resolver: Resolver<S, Z>, fonts: Fonts) -> Self {
        Self {
            layout,
            resolver,
            fonts,
        }
    }

    pub fn layout_config(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Render `albums` in collection order.
    ///
    /// Every key is parsed, and the canvas size fixed, before any cover is fetched. A
    /// malformed key or an unreachable placeholder aborts the whole render.
    pub fn compose(&self, albums: &AlbumCollection) -> Result<RgbImage> {
        let entries = albums.entries()?;
        self.compose_entries(&entries)
    }

    pub fn compose_entries(&self, entries: &[AlbumEntry]) -> Result<RgbImage> {
        self.layout.validate()?;
        let layout = Layout::compute(entries.len(), &self.layout)?;
        tracing::info!(
            "Composing {} albums into {} rows ({}x{})",
            entries.len(),
            layout.rows,
            layout.width,
            layout.height
        );

        let mut canvas =
            RgbImage::from_pixel(layout.width, layout.height, self.layout.background.into());
        self.draw_title(&mut canvas, &layout);

        let mut tally = ProvenanceTally::default();
        for (entry, cell) in entries.iter().zip(layout.cells()) {
            let cover = self.resolver.resolve_entry(entry)?;
            tally.record(cover.provenance);

            let thumbnail = imageops::resize(
                &cover.image.to_rgb8(),
                self.layout.cell_width,
                self.layout.cell_height,
                imageops::FilterType::CatmullRom,
            );
            imageops::replace(&mut canvas, &thumbnail, cell.x.into(), cell.y.into());

            self.draw_captions(&mut canvas, cell, entry);
        }

        tracing::info!(
            "Composed {} covers: {} from URLs, {} from MusicBrainz, {} placeholders",
            entries.len(),
            tally.direct_url,
            tally.catalog_lookup,
            tally.placeholder
        );
        Ok(canvas)
    }

    fn draw_title(&self, canvas: &mut RgbImage, layout: &Layout) {
        self.fonts.title.draw_centered(
            canvas,
            (layout.width / 2) as i32,
            self.layout.title_offset as i32,
            self.foreground(),
            &self.layout.title,
        );
    }

    fn draw_captions(&self, canvas: &mut RgbImage, cell: CellPlacement, entry: &AlbumEntry) {
        let center_x = coordinate(u64::from(cell.x) + u64::from(self.layout.cell_width / 2));
        let artist_y = u64::from(cell.y)
            + u64::from(self.layout.cell_height)
            + u64::from(self.layout.caption_offset);
        let album_y = coordinate(artist_y + u64::from(self.layout.caption_line_gap));
        let artist_y = coordinate(artist_y);

        let font = &self.fonts.caption;
        font.draw_centered(canvas, center_x, artist_y, self.foreground(), &entry.key.artist);
        font.draw_centered(canvas, center_x, album_y, self.foreground(), &entry.key.album);
    }

    fn foreground(&self) -> Rgb<u8> {
        self.layout.foreground.into()
    }
}

/// Positions past the canvas are clipped when drawn, so saturating is enough.
fn coordinate(value: u64) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[derive(Default)]
struct ProvenanceTally {
    direct_url: usize,
    catalog_lookup: usize,
    placeholder: usize,
}
impl ProvenanceTally {
    fn record(&mut self, provenance: Provenance) {
        match provenance {
            Provenance::DirectUrl => self.direct_url += 1,
            Provenance::CatalogLookup => self.catalog_lookup += 1,
            Provenance::Placeholder => self.placeholder += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Error, FontConfig, ResolverConfig,
        resolver::tests::{FakeSource, RecordingSleeper, png, test_config},
    };

    const RED: [u8; 3] = [255, 0, 0];
    const GREEN: [u8; 3] = [0, 255, 0];
    const BLUE: [u8; 3] = [0, 0, 255];
    const BACKGROUND: Rgb<u8> = Rgb([0x19, 0x14, 0x14]);

    fn compositor<'a>(
        source: &'a FakeSource,
        sleeper: &'a RecordingSleeper,
        layout: LayoutConfig,
        resolver: ResolverConfig,
    ) -> Compositor<&'a FakeSource, &'a RecordingSleeper> {
        Compositor::new(
            layout,
            Resolver::with_sleeper(source, sleeper, resolver),
            Fonts::builtin(&FontConfig::default()),
        )
    }

    fn albums(entries: &[(&str, Option<&str>)]) -> AlbumCollection {
        entries
            .iter()
            .map(|(key, url)| (key.to_string(), url.map(str::to_string)))
            .collect()
    }

    fn assert_color(canvas: &RgbImage, x: u32, y: u32, expected: [u8; 3]) {
        let actual = canvas.get_pixel(x, y).0;
        let close = actual
            .iter()
            .zip(expected)
            .all(|(a, e)| a.abs_diff(e) <= 2);
        assert!(close, "pixel ({x}, {y}) is {actual:?}, expected {expected:?}");
    }

    fn has_text(canvas: &RgbImage, xs: std::ops::Range<u32>, ys: std::ops::Range<u32>) -> bool {
        ys.flat_map(|y| xs.clone().map(move |x| (x, y)))
            .any(|(x, y)| *canvas.get_pixel(x, y) == Rgb([255, 255, 255]))
    }

    #[test]
    fn test_single_album_with_direct_url() {
        let mut source = FakeSource::with_placeholder();
        source
            .urls
            .insert("http://x/cover.png".to_string(), png(RED, 50, 30));
        let sleeper = RecordingSleeper::default();
        let compositor = compositor(&source, &sleeper, LayoutConfig::default(), test_config());

        let canvas = compositor
            .compose(&albums(&[("A|B", Some("http://x/cover.png"))]))
            .unwrap();

        assert_eq!(canvas.dimensions(), (1120, 400));
        assert_eq!(source.search_count.get(), 0);

        // Thumbnail stretched to exactly 200x200 at (20, 140).
        assert_color(&canvas, 20, 140, RED);
        assert_color(&canvas, 219, 339, RED);
        assert_color(&canvas, 19, 140, BACKGROUND.0);
        assert_color(&canvas, 220, 140, BACKGROUND.0);
        assert_color(&canvas, 20, 139, BACKGROUND.0);
        assert_color(&canvas, 20, 340, BACKGROUND.0);

        // Artist caption, then album caption, beneath the thumbnail.
        assert!(has_text(&canvas, 20..220, 345..353));
        assert!(has_text(&canvas, 20..220, 365..373));
        assert!(!has_text(&canvas, 20..220, 353..365));

        // Title in the title band.
        assert!(has_text(&canvas, 0..1120, 30..54));
    }

    #[test]
    fn test_empty_collection_is_title_only() {
        let source = FakeSource::with_placeholder();
        let sleeper = RecordingSleeper::default();
        let compositor = compositor(&source, &sleeper, LayoutConfig::default(), test_config());

        let canvas = compositor.compose(&AlbumCollection::default()).unwrap();

        assert_eq!(canvas.dimensions(), (1120, 140));
        assert!(has_text(&canvas, 0..1120, 30..54));
        assert!(source.fetched_urls.borrow().is_empty());
    }

    #[test]
    fn test_cells_follow_collection_order_and_wrap() {
        let mut source = FakeSource::with_placeholder();
        let colors = [RED, GREEN, RED, GREEN, RED, GREEN];
        let mut entries = Vec::new();
        for (i, color) in colors.iter().enumerate() {
            let url = format!("http://x/{i}.png");
            source.urls.insert(url.clone(), png(*color, 10, 10));
            entries.push((format!("Artist {i}|Album {i}"), Some(url)));
        }
        let sleeper = RecordingSleeper::default();
        let compositor = compositor(&source, &sleeper, LayoutConfig::default(), test_config());

        let canvas = compositor
            .compose(&entries.into_iter().collect::<AlbumCollection>())
            .unwrap();

        assert_eq!(canvas.dimensions(), (1120, 660));
        let layout = Layout::compute(6, compositor.layout_config()).unwrap();
        for (index, color) in colors.iter().enumerate() {
            let cell = layout.cell(index);
            assert_color(&canvas, cell.x + 100, cell.y + 100, *color);
        }
        assert_eq!(layout.cell(5), CellPlacement { x: 20, y: 400 });

        let fetched: Vec<String> = source
            .fetched_urls
            .borrow()
            .iter()
            .map(|(url, _)| url.clone())
            .collect();
        assert_eq!(
            fetched,
            (0..6).map(|i| format!("http://x/{i}.png")).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_compose_is_repeatable() {
        let mut source = FakeSource::with_placeholder();
        source.urls.insert("http://x/a.png".to_string(), png(RED, 3, 7));
        let sleeper = RecordingSleeper::default();
        let compositor = compositor(&source, &sleeper, LayoutConfig::default(), test_config());
        let input = albums(&[
            ("A|B", Some("http://x/a.png")),
            ("C|D", None),
            ("E|F", Some("http://x/missing.png")),
        ]);

        let first = compositor.compose(&input).unwrap();
        let second = compositor.compose(&input).unwrap();

        assert_eq!(first.dimensions(), second.dimensions());
        assert!(first == second);
        // The two unresolved albums both end up as the placeholder.
        let layout = Layout::compute(3, compositor.layout_config()).unwrap();
        assert_color(&first, layout.cell(1).x + 5, layout.cell(1).y + 5, BLUE);
        assert_color(&first, layout.cell(2).x + 5, layout.cell(2).y + 5, BLUE);
    }

    #[test]
    fn test_malformed_key_aborts_before_fetching() {
        let source = FakeSource::with_placeholder();
        let sleeper = RecordingSleeper::default();
        let compositor = compositor(&source, &sleeper, LayoutConfig::default(), test_config());

        let result = compositor.compose(&albums(&[("A|B", None), ("Broken", None)]));

        assert!(matches!(result, Err(Error::MalformedAlbumKey { key }) if key == "Broken"));
        assert_eq!(source.search_count.get(), 0);
        assert!(source.fetched_urls.borrow().is_empty());
    }

    #[test]
    fn test_unreachable_placeholder_aborts_render() {
        let source = FakeSource::default();
        let sleeper = RecordingSleeper::default();
        let compositor = compositor(&source, &sleeper, LayoutConfig::default(), test_config());

        let result = compositor.compose(&albums(&[("A|B", Some("http://x/gone.png"))]));

        assert!(matches!(result, Err(Error::PlaceholderUnreachable { .. })));
    }

    #[test]
    fn test_alternate_layout() {
        let mut source = FakeSource::with_placeholder();
        source.urls.insert("http://x/a.png".to_string(), png(RED, 4, 4));
        let sleeper = RecordingSleeper::default();
        let layout = LayoutConfig {
            cell_width: 40,
            cell_height: 30,
            padding: 4,
            columns: 2,
            title_band: 24,
            caption_band: 20,
            caption_offset: 2,
            caption_line_gap: 9,
            ..Default::default()
        };
        let compositor = compositor(&source, &sleeper, layout, test_config());

        let canvas = compositor
            .compose(&albums(&[
                ("A|B", Some("http://x/a.png")),
                ("C|D", Some("http://x/a.png")),
                ("E|F", Some("http://x/a.png")),
            ]))
            .unwrap();

        // 2 * 40 + 3 * 4 wide, 2 * (30 + 20) + 3 * 4 + 24 tall.
        assert_eq!(canvas.dimensions(), (92, 136));
        assert_color(&canvas, 4, 28, RED);
        assert_color(&canvas, 48, 28, RED);
        assert_color(&canvas, 4, 82, RED);
        assert_color(&canvas, 48, 82, BACKGROUND.0);
    }

    #[test]
    fn test_invalid_layout_is_rejected() {
        let source = FakeSource::with_placeholder();
        let sleeper = RecordingSleeper::default();
        let layout = LayoutConfig {
            columns: 0,
            ..Default::default()
        };
        let compositor = compositor(&source, &sleeper, layout, test_config());

        assert!(matches!(
            compositor.compose(&AlbumCollection::default()),
            Err(Error::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_oversized_layout_is_rejected_before_fetching() {
        let source = FakeSource::with_placeholder();
        let sleeper = RecordingSleeper::default();
        let layout = LayoutConfig {
            cell_width: 1_000_000_000,
            ..Default::default()
        };
        let compositor = compositor(&source, &sleeper, layout, test_config());

        assert!(matches!(
            compositor.compose(&albums(&[("A|B", Some("http://x/a.png"))])),
            Err(Error::InvalidLayout(_))
        ));
        assert!(source.fetched_urls.borrow().is_empty());
    }
}
