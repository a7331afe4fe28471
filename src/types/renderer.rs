use crate::types::{CaseRecord, Category, ImageSource, Rect, RenderedSurface, SurfaceNode};

/// logical sheet width in display pixels
pub const SHEET_WIDTH: f32 = 1000.0;

const PADDING: f32 = 22.0;
const COLUMN_GAP: f32 = 16.0;
const BODY_SIZE: f32 = 13.5;
const LINE_FACTOR: f32 = 1.35;
/// crude average glyph advance as a fraction of the font size, used to
/// estimate wrapping; the capture is geometry-accurate at this estimate
const GLYPH_RATIO: f32 = 0.52;

/// remote QR resource embedded in the footer; the fetch itself stays
/// outside the core, an embedder hands us the resolved bytes
pub const QR_URL: &str = "https://api.qrserver.com/v1/create-qr-code/?size=100x100&color=000000&bgcolor=FFFFFF&data=https%3A%2F%2Foutlook.office.com%2Fbook%2FRegionalITTeamBookingTime%40usasean.org%2F%3Fismsaljsauthenabled";

const BOOKING_URL: &str =
    "https://outlook.office.com/book/RegionalITTeamBookingTime@usasean.org/?ismsaljsauthenabled";

/// vertical write head for one column, scrolled downward as nodes land
struct WriteHead {
    x: f32,
    y: f32,
    width: f32,
}

impl WriteHead {
    fn new(x: f32, y: f32, width: f32) -> Self {
        WriteHead { x, y, width }
    }

    /// scrolls the head down the column
    fn feed(&mut self, dy: f32) {
        self.y += dy;
    }
}

/// estimated pixel height of a wrapped text run
fn text_height(text: &str, size: f32, width: f32) -> f32 {
    let advance = size * GLYPH_RATIO;
    let per_line = (width / advance).max(1.0) as usize;
    let lines = text.chars().count().div_ceil(per_line).max(1);

    lines as f32 * size * LINE_FACTOR
}

/// Produces the rendered cheat sheet for one case record: a fixed-width
/// bordered panel with a header, two columns of cards and a footer, every
/// node measured in a single synchronous pass. Capture and annotation
/// measurement both read the finished tree, so the geometry the raster sees
/// is exactly the geometry the link overlays are computed from.
pub struct Renderer {
    qr_image: Option<Vec<u8>>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer { qr_image: None }
    }

    /// builder function supplying pre-resolved PNG bytes for the QR image;
    /// without them the image node stays remote and raster capture fails
    pub fn with_qr_image(mut self, png: Vec<u8>) -> Self {
        self.qr_image = Some(png);
        self
    }

    pub fn render(&self, record: &CaseRecord) -> RenderedSurface {
        let mut nodes = Vec::with_capacity(64);
        let column_width = (SHEET_WIDTH - PADDING * 2.0 - COLUMN_GAP) / 2.0;
        let is_primary = record.category == Category::Primary;
        let label = record.category.label();

        // header spans both columns
        let mut head = WriteHead::new(PADDING, PADDING, SHEET_WIDTH - PADDING * 2.0);
        self.heading(
            &mut nodes,
            &mut head,
            1,
            &format!("US-ABC IT Onboarding ({label}s) - Quick Start"),
        );
        self.paragraph(
            &mut nodes,
            &mut head,
            true,
            "Cheat sheet for email, required apps, mobile setup, Zoom, GrowthZone, and IT support. US-ASEAN Business Council Inc. (US-ABC).",
        );
        self.divider(&mut nodes, &mut head);

        let body_top = head.y;
        let mut left = WriteHead::new(PADDING, body_top, column_width);
        let mut right = WriteHead::new(PADDING + column_width + COLUMN_GAP, body_top, column_width);

        self.left_column(&mut nodes, &mut left, record, is_primary, label);
        self.right_column(&mut nodes, &mut right, record);

        // footer starts below the taller column
        let mut foot = WriteHead::new(
            PADDING,
            left.y.max(right.y) + 16.0,
            SHEET_WIDTH - PADDING * 2.0,
        );
        self.footer(&mut nodes, &mut foot, label);

        // whole-pixel sheet height so density multiples scale exactly
        let bounds = Rect::new(0.0, 0.0, SHEET_WIDTH, (foot.y + PADDING).ceil());
        RenderedSurface::new(bounds, nodes)
    }

    fn left_column(
        &self,
        nodes: &mut Vec<SurfaceNode>,
        head: &mut WriteHead,
        record: &CaseRecord,
        is_primary: bool,
        label: &str,
    ) {
        self.heading(nodes, head, 2, &format!("{label} Details"));
        self.key_value(
            nodes,
            head,
            &format!("{label} Name"),
            &format!("{} {}", record.given_name, record.family_name),
            false,
        );
        self.key_value(nodes, head, "Start Date", &record.display_start_date(), true);
        self.key_value(nodes, head, "Office / Team", record.display_office(), true);
        self.key_value(nodes, head, "Supervisor", record.display_supervisor(), true);

        if is_primary {
            self.heading(nodes, head, 2, "Device Policy (BYOD)");
            self.paragraph(
                nodes,
                head,
                false,
                "Interns use personal devices (BYOD). Company devices provided on a need basis. Contact IT immediately if you have hardware/compatibility issues.",
            );
        } else {
            self.heading(nodes, head, 2, "Device Policy");
            self.paragraph(
                nodes,
                head,
                false,
                "Work devices will be provided and processed by the IT Department.",
            );
        }

        self.heading(nodes, head, 2, "Email Login");
        self.paragraph(nodes, head, false, "Sign in with US-ABC credentials:");
        self.key_value(nodes, head, "Username", &record.login_handle(), true);
        self.key_value(nodes, head, "Password", "(See welcome email)", true);
        self.link(
            nodes,
            head,
            "https://outlook.office365.com/",
            "https://outlook.office365.com/",
        );

        self.heading(nodes, head, 2, "Multifactor Authentication (MFA)");
        self.paragraph(
            nodes,
            head,
            false,
            "Set up MFA immediately after first login. Download Microsoft Authenticator:",
        );
        self.link(
            nodes,
            head,
            "iOS App Store",
            "https://apps.apple.com/us/app/microsoft-authenticator/id983156458",
        );
        self.link(
            nodes,
            head,
            "Google Play",
            "https://play.google.com/store/apps/details?id=com.azure.authenticator",
        );

        self.heading(nodes, head, 2, "Device Requirements");
        self.list_item(nodes, head, Some("Windows:"), "Windows 10 or later");
        self.list_item(nodes, head, Some("macOS:"), "macOS 12 (Monterey) or later");
        self.list_item(nodes, head, Some("Internet:"), "Stable connection required");
        self.list_item(nodes, head, Some("Browser:"), "Latest Chrome / Edge / Safari");
        self.list_item(
            nodes,
            head,
            Some("Hardware:"),
            "Webcam + microphone/headset required",
        );
    }

    fn right_column(&self, nodes: &mut Vec<SurfaceNode>, head: &mut WriteHead, record: &CaseRecord) {
        self.heading(nodes, head, 2, "Required Apps (Laptop)");
        self.list_item(nodes, head, Some("Zoom:"), "");
        self.link(nodes, head, "zoom.us/download", "https://zoom.us/download");
        self.list_item(nodes, head, Some("Office 365:"), "");
        self.link(nodes, head, "portal.office.com", "https://portal.office.com/");
        self.list_item(nodes, head, Some("Microsoft Teams:"), "");
        self.link(
            nodes,
            head,
            "Download Teams",
            "https://www.microsoft.com/en-us/microsoft-365/microsoft-teams/download-app",
        );

        self.heading(nodes, head, 2, "Mobile Setup (O365 Access)");
        self.paragraph(
            nodes,
            head,
            false,
            "Required: Install InTune Management Profile to access work apps.",
        );
        self.link(
            nodes,
            head,
            "View Intune Installation Guide",
            "https://www.sweetprocess.com/kb/WkD8IjYD2HGR/article/dJBwI1fD5Zo/intune-install-intune-company-portal-on-ios/",
        );
        self.paragraph(nodes, head, false, "Install these apps:");
        self.list_item(nodes, head, None, "Microsoft InTune");
        self.list_item(nodes, head, None, "Microsoft Outlook");
        self.list_item(nodes, head, None, "Microsoft Teams");
        self.list_item(nodes, head, None, "Zoom");

        self.heading(nodes, head, 2, "Zoom Access");
        self.paragraph(
            nodes,
            head,
            false,
            "Select SSO (Single Sign-On) login. Domain: usasean. Log in with US-ABC email credentials.",
        );

        self.heading(nodes, head, 2, "GrowthZone");
        self.paragraph(
            nodes,
            head,
            false,
            &format!(
                "Check {} email for invite and setup instructions.",
                record.login_handle()
            ),
        );

        self.heading(nodes, head, 2, "Security & Compliance");
        self.list_item(nodes, head, None, "Never share passwords.");
        self.list_item(nodes, head, None, "Lock screen when away.");
        self.list_item(nodes, head, None, "Use US-ABC email for work only.");
        self.list_item(
            nodes,
            head,
            None,
            "Store documents in O365/OneDrive/SharePoint.",
        );
        self.list_item(
            nodes,
            head,
            Some("Suspicious emails?"),
            "Forward to security (CC IT):",
        );
        self.link(
            nodes,
            head,
            "security@usasean.org",
            "mailto:security@usasean.org",
        );

        self.heading(nodes, head, 2, "IT Training & Support");
        self.list_item(nodes, head, Some("Book Onboarding/Support:"), "");
        self.link(nodes, head, "Booking Portal Link", BOOKING_URL);
        self.list_item(nodes, head, Some("Email:"), "");
        self.link(
            nodes,
            head,
            "support@usasean.org",
            "mailto:support@usasean.org",
        );
    }

    fn footer(&self, nodes: &mut Vec<SurfaceNode>, head: &mut WriteHead, label: &str) {
        self.divider(nodes, head);

        self.heading(nodes, head, 2, "Key Contacts");
        self.list_item(nodes, head, Some("Kevin"), "IT Director");
        self.link(
            nodes,
            head,
            "kbyfield@usasean.org",
            "mailto:kbyfield@usasean.org",
        );
        self.list_item(nodes, head, Some("Ric"), "Regional IT Manager");
        self.link(
            nodes,
            head,
            "elacambra@usasean.org",
            "mailto:elacambra@usasean.org",
        );
        self.list_item(nodes, head, Some("Urgent (DC):"), "202-416-6731 / WhatsApp");
        self.link(nodes, head, "+63 (917) 1163-686", "https://wa.me/639171163686");

        // QR block, right-aligned
        let qr_side = 90.0;
        let qr_left = head.x + head.width - qr_side;
        self.paragraph(nodes, head, false, "Scan for IT Support");
        nodes.push(SurfaceNode::Image {
            rect: Rect::new(qr_left, head.y, qr_side, qr_side),
            alt: "Book IT Support QR".to_string(),
            source: match &self.qr_image {
                Some(png) => ImageSource::Embedded(png.clone()),
                None => ImageSource::Remote(QR_URL.to_string()),
            },
        });
        head.feed(qr_side + 8.0);

        self.link(nodes, head, "www.usasean.org", "https://www.usasean.org/");
        self.paragraph(
            nodes,
            head,
            true,
            &format!("US-ASEAN Business Council Inc. {label} IT Onboarding | v1.5"),
        );
    }

    fn heading(&self, nodes: &mut Vec<SurfaceNode>, head: &mut WriteHead, level: u8, text: &str) {
        let size = if level == 1 { 22.0 } else { 14.0 };
        // section headings carry the original 14px top gap
        if level > 1 {
            head.feed(14.0);
        }

        let height = text_height(text, size, head.width);
        nodes.push(SurfaceNode::Heading {
            rect: Rect::new(head.x, head.y, head.width, height),
            text: text.to_string(),
            level,
        });
        head.feed(height + 6.0);
    }

    fn paragraph(&self, nodes: &mut Vec<SurfaceNode>, head: &mut WriteHead, muted: bool, text: &str) {
        let height = text_height(text, BODY_SIZE, head.width);
        nodes.push(SurfaceNode::Paragraph {
            rect: Rect::new(head.x, head.y, head.width, height),
            text: text.to_string(),
            muted,
        });
        head.feed(height + 10.0);
    }

    fn key_value(
        &self,
        nodes: &mut Vec<SurfaceNode>,
        head: &mut WriteHead,
        label: &str,
        value: &str,
        code: bool,
    ) {
        let value_width = head.width - 130.0;
        let height = text_height(value, BODY_SIZE, value_width);
        nodes.push(SurfaceNode::KeyValue {
            rect: Rect::new(head.x, head.y, head.width, height),
            label: label.to_string(),
            value: value.to_string(),
            code,
        });
        head.feed(height + 8.0);
    }

    fn list_item(
        &self,
        nodes: &mut Vec<SurfaceNode>,
        head: &mut WriteHead,
        lead: Option<&str>,
        text: &str,
    ) {
        let full = match lead {
            Some(lead) => format!("{lead} {text}"),
            None => text.to_string(),
        };
        let height = text_height(&full, BODY_SIZE, head.width - 18.0);
        nodes.push(SurfaceNode::ListItem {
            rect: Rect::new(head.x + 18.0, head.y, head.width - 18.0, height),
            text: text.to_string(),
            lead: lead.map(str::to_string),
        });
        head.feed(height + 6.0);
    }

    /// links get their own measured node; these rects are what the
    /// paginated export maps into page space
    fn link(&self, nodes: &mut Vec<SurfaceNode>, head: &mut WriteHead, text: &str, url: &str) {
        let size = BODY_SIZE;
        let width = (text.chars().count() as f32 * size * GLYPH_RATIO).min(head.width);
        let height = size * LINE_FACTOR;
        nodes.push(SurfaceNode::Link {
            rect: Rect::new(head.x + 18.0, head.y, width, height),
            text: text.to_string(),
            url: url.to_string(),
        });
        head.feed(height + 6.0);
    }

    fn divider(&self, nodes: &mut Vec<SurfaceNode>, head: &mut WriteHead) {
        head.feed(14.0);
        nodes.push(SurfaceNode::Divider {
            rect: Rect::new(head.x, head.y, head.width, 1.0),
        });
        head.feed(15.0);
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::SurfaceGeometry;

    fn sample_record() -> CaseRecord {
        CaseRecord {
            given_name: "Jane".to_string(),
            family_name: "Doe".to_string(),
            start_date: "2026-02-16".to_string(),
            office: "Singapore".to_string(),
            supervisor: "K. Byfield".to_string(),
            category: Category::Primary,
        }
    }

    #[test]
    fn surface_has_fixed_logical_width() {
        let surface = Renderer::new().render(&sample_record());
        assert_eq!(surface.bounding_rect().width, SHEET_WIDTH);
        assert!(surface.bounding_rect().height > 0.0);
    }

    #[test]
    fn every_node_lands_inside_the_bounds() {
        let surface = Renderer::new().render(&sample_record());
        let bounds = surface.bounding_rect();

        for node in surface.nodes() {
            let rect = node.rect();
            assert!(rect.left >= bounds.left, "{node:?} left of bounds");
            assert!(rect.right() <= bounds.right() + 0.5, "{node:?} past right edge");
            assert!(rect.top >= bounds.top, "{node:?} above bounds");
            assert!(rect.bottom() <= bounds.bottom() + 0.5, "{node:?} below bounds");
        }
    }

    #[test]
    fn renders_links_in_traversal_order_with_urls() {
        let surface = Renderer::new().render(&sample_record());
        let regions = surface.link_regions();

        assert!(regions.len() >= 10, "expected a link-rich sheet");
        assert_eq!(regions[0].url, "https://outlook.office365.com/");
        assert!(regions.iter().any(|r| r.url == "https://zoom.us/download"));
        assert!(regions.iter().any(|r| r.url.starts_with("mailto:")));
        assert!(regions.iter().all(|r| r.rect.is_measurable()));
    }

    #[test]
    fn category_switches_device_policy_copy() {
        let mut record = sample_record();
        record.category = Category::Secondary;
        let surface = Renderer::new().render(&record);

        let has_staff_policy = surface.nodes().iter().any(|node| match node {
            SurfaceNode::Heading { text, .. } => text == "Device Policy",
            _ => false,
        });
        assert!(has_staff_policy);
    }

    #[test]
    fn qr_image_is_remote_until_bytes_are_supplied() {
        let surface = Renderer::new().render(&sample_record());
        let remote = surface.nodes().iter().any(|node| {
            matches!(
                node,
                SurfaceNode::Image {
                    source: ImageSource::Remote(_),
                    ..
                }
            )
        });
        assert!(remote);

        let surface = Renderer::new()
            .with_qr_image(vec![0x89, b'P', b'N', b'G'])
            .render(&sample_record());
        let embedded = surface.nodes().iter().any(|node| {
            matches!(
                node,
                SurfaceNode::Image {
                    source: ImageSource::Embedded(_),
                    ..
                }
            )
        });
        assert!(embedded);
    }
}
