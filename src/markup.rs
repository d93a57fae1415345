//! The salon's single page as a [`Document`], laid out top to bottom.
//!
//! Used by the headless host and by tests that need the whole page.

use crate::dom::{Document, NodeId, Rect};

/// Localized copy: (English, Japanese).
type Localized = (&'static str, &'static str);

const NAV_LINKS: [(&str, Localized); 5] = [
    ("#home", ("Home", "ホーム")),
    ("#services", ("Services", "サービス")),
    ("#about", ("About", "サロンについて")),
    ("#gallery", ("Gallery", "ギャラリー")),
    ("#contact", ("Contact", "お問い合わせ")),
];

const SERVICES: [(Localized, Localized); 3] = [
    (
        ("Precision Cut", "プレシジョンカット"),
        ("Tailored cuts by Tokyo-trained stylists", "東京で経験を積んだスタイリストによるカット"),
    ),
    (
        ("Hair Straightening", "縮毛矯正"),
        ("Japanese straightening for lasting, natural results", "自然な仕上がりが長く続く縮毛矯正"),
    ),
    (
        ("Color & Highlights", "カラー・ハイライト"),
        ("Dimensional color with gentle products", "髪にやさしい薬剤で立体的なカラー"),
    ),
];

/// (data-target, shown suffix, label)
const STATS: [(&str, &str, Localized); 3] = [
    ("15", "+", ("Years of Experience", "年の経験")),
    ("5000", "+", ("Happy Clients", "名のお客様")),
    ("2", "", ("Vancouver Locations", "バンクーバーの店舗")),
];

const GALLERY: [&str; 4] = [
    "/images/gallery-1.jpg",
    "/images/gallery-2.jpg",
    "/images/gallery-3.jpg",
    "/images/gallery-4.jpg",
];

const LOCATIONS: [Localized; 2] = [
    ("Downtown Vancouver", "バンクーバー ダウンタウン"),
    ("Kitsilano", "キツラノ"),
];

const SERVICE_OPTIONS: [(&str, Localized); 4] = [
    ("", ("Select a service", "サービスを選択")),
    ("cut", ("Precision Cut", "プレシジョンカット")),
    ("straightening", ("Hair Straightening", "縮毛矯正")),
    ("color", ("Color & Highlights", "カラー・ハイライト")),
];

const SECTION_HEIGHT: f64 = 800.0;

/// Running vertical layout cursor.
struct Layout {
    y: f64,
}

impl Layout {
    fn place(&mut self, doc: &mut Document, node: NodeId, height: f64) {
        doc.set_rect(node, Rect::new(self.y, height));
        self.y += height;
    }
}

fn localized(doc: &mut Document, tag: &str, copy: Localized, parent: NodeId) -> NodeId {
    doc.element(tag)
        .attr("data-en", copy.0)
        .attr("data-ja", copy.1)
        .html(copy.0)
        .append_to(parent)
}

/// Build the full page in its initial, English state.
pub fn salon_page() -> Document {
    let mut doc = Document::new();
    let head = doc.head();
    let body = doc.body();
    doc.element("meta")
        .attr("name", "description")
        .attr("content", "")
        .append_to(head);

    let mut layout = Layout { y: 0.0 };
    navbar(&mut doc, body);
    hero(&mut doc, body, &mut layout);
    services(&mut doc, body, &mut layout);
    about(&mut doc, body, &mut layout);
    gallery(&mut doc, body, &mut layout);
    locations(&mut doc, body, &mut layout);
    contact(&mut doc, body, &mut layout);
    doc
}

fn navbar(doc: &mut Document, body: NodeId) {
    let nav = doc.element("nav").class("navbar").append_to(body);
    doc.element("a")
        .class("logo")
        .attr("href", "#home")
        .text("i's Hair Salon")
        .append_to(nav);

    let menu = doc.element("ul").class("nav-menu").append_to(nav);
    for (href, copy) in NAV_LINKS {
        let item = doc.element("li").append_to(menu);
        let link = localized(doc, "a", copy, item);
        doc.add_class(link, "nav-link");
        doc.set_attr(link, "href", href);
    }

    let switcher = doc.element("div").class("language-switcher").append_to(nav);
    doc.element("button")
        .class("lang-btn")
        .attr("data-lang", "en")
        .text("EN")
        .append_to(switcher);
    doc.element("button")
        .class("lang-btn")
        .attr("data-lang", "ja")
        .text("日本語")
        .append_to(switcher);

    let hamburger = doc.element("div").class("hamburger").append_to(nav);
    for _ in 0..3 {
        doc.element("span").class("bar").append_to(hamburger);
    }
}

fn hero(doc: &mut Document, body: NodeId, layout: &mut Layout) {
    let section = doc
        .element("section")
        .class("hero")
        .attr("id", "home")
        .append_to(body);
    layout.place(doc, section, SECTION_HEIGHT);

    let background = doc.element("div").class("hero-background").append_to(section);
    doc.element("img")
        .attr("src", "/images/hero.jpg")
        .attr("alt", "Salon interior")
        .rect(0.0, SECTION_HEIGHT)
        .append_to(background);

    let content = doc.element("div").class("hero-content").append_to(section);
    localized(
        doc,
        "h1",
        ("Japanese <span>Hair Artistry</span>", "日本の<span>ヘアアート</span>"),
        content,
    );
    let cta = localized(doc, "a", ("Book Appointment", "予約する"), content);
    doc.add_class(cta, "btn");
    doc.set_attr(cta, "href", "#contact");
}

fn services(doc: &mut Document, body: NodeId, layout: &mut Layout) {
    let section = doc
        .element("section")
        .class("services")
        .attr("id", "services")
        .append_to(body);
    let top = layout.y;
    layout.place(doc, section, SECTION_HEIGHT);
    localized(doc, "h2", ("Our Services", "サービス"), section);

    for (index, (title, blurb)) in SERVICES.into_iter().enumerate() {
        let card = doc.element("div").class("service-card").append_to(section);
        doc.set_rect(card, Rect::new(top + 150.0 + index as f64 * 200.0, 180.0));
        localized(doc, "h3", title, card);
        localized(doc, "p", blurb, card);
    }
}

fn about(doc: &mut Document, body: NodeId, layout: &mut Layout) {
    let section = doc
        .element("section")
        .class("about")
        .attr("id", "about")
        .append_to(body);
    let top = layout.y;
    layout.place(doc, section, SECTION_HEIGHT);
    localized(doc, "h2", ("About Us", "サロンについて"), section);

    let stats = doc.element("div").class("stats").append_to(section);
    for (target, suffix, label) in STATS {
        let stat = doc.element("div").class("stat").append_to(stats);
        doc.element("span")
            .class("stat-number")
            .attr("data-target", &format!("{target}{suffix}"))
            .text("0")
            .rect(top + 400.0, 60.0)
            .append_to(stat);
        localized(doc, "span", label, stat);
    }
}

fn gallery(doc: &mut Document, body: NodeId, layout: &mut Layout) {
    let section = doc
        .element("section")
        .class("gallery")
        .attr("id", "gallery")
        .append_to(body);
    let top = layout.y;
    layout.place(doc, section, SECTION_HEIGHT);
    localized(doc, "h2", ("Gallery", "ギャラリー"), section);

    for (index, src) in GALLERY.into_iter().enumerate() {
        let item = doc.element("div").class("gallery-item").append_to(section);
        let row = (index / 2) as f64;
        doc.set_rect(item, Rect::new(top + 150.0 + row * 300.0, 280.0));
        doc.element("img")
            .attr("data-src", src)
            .attr("alt", "Salon work")
            .rect(top + 150.0 + row * 300.0, 280.0)
            .append_to(item);
    }
}

fn locations(doc: &mut Document, body: NodeId, layout: &mut Layout) {
    let section = doc
        .element("section")
        .class("locations")
        .attr("id", "locations")
        .append_to(body);
    let top = layout.y;
    layout.place(doc, section, SECTION_HEIGHT);
    localized(doc, "h2", ("Our Locations", "店舗"), section);

    for (index, name) in LOCATIONS.into_iter().enumerate() {
        let card = doc.element("div").class("location-card").append_to(section);
        doc.set_rect(card, Rect::new(top + 150.0 + index as f64 * 300.0, 260.0));
        localized(doc, "h3", name, card);
    }
}

fn contact(doc: &mut Document, body: NodeId, layout: &mut Layout) {
    let section = doc
        .element("section")
        .class("contact")
        .attr("id", "contact")
        .append_to(body);
    let top = layout.y;
    layout.place(doc, section, SECTION_HEIGHT);

    let background = doc.element("div").class("contact-background").append_to(section);
    doc.element("img")
        .attr("src", "/images/contact.jpg")
        .attr("alt", "")
        .rect(top, SECTION_HEIGHT)
        .append_to(background);
    localized(doc, "h2", ("Book an Appointment", "ご予約"), section);

    let form = doc.element("form").class("contact-form").append_to(section);
    let fields: [(&str, &str, bool, Localized); 3] = [
        ("name", "text", true, ("Name", "お名前")),
        ("email", "email", true, ("Email", "メールアドレス")),
        ("phone", "tel", false, ("Phone", "電話番号")),
    ];
    for (name, kind, required, label) in fields {
        let group = doc.element("div").class("form-group").append_to(form);
        localized(doc, "label", label, group);
        let input = doc
            .element("input")
            .attr("type", kind)
            .attr("name", name)
            .attr("id", name)
            .append_to(group);
        if required {
            doc.set_attr(input, "required", "");
        }
    }

    let group = doc.element("div").class("form-group").append_to(form);
    localized(doc, "label", ("Service", "サービス"), group);
    let select = doc
        .element("select")
        .attr("name", "service")
        .attr("id", "service")
        .attr("required", "")
        .append_to(group);
    for (value, copy) in SERVICE_OPTIONS {
        doc.element("option")
            .attr("value", value)
            .attr("data-en", copy.0)
            .attr("data-ja", copy.1)
            .text(copy.0)
            .append_to(select);
    }

    let group = doc.element("div").class("form-group").append_to(form);
    localized(doc, "label", ("Message", "メッセージ"), group);
    doc.element("textarea")
        .attr("name", "message")
        .attr("id", "message")
        .append_to(group);

    let button = localized(doc, "button", ("Book Appointment", "予約する"), form);
    doc.set_attr(button, "type", "submit");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Selector;

    #[test]
    fn test_page_has_every_hook() {
        let doc = salon_page();
        for class in [
            "navbar",
            "hamburger",
            "nav-menu",
            "contact-form",
            "hero-background",
            "contact-background",
        ] {
            assert!(doc.query(&Selector::class(class)).is_some(), "missing .{}", class);
        }
        assert_eq!(doc.query_all(&Selector::class("lang-btn")).len(), 2);
        assert_eq!(doc.query_all(&Selector::class("nav-link")).len(), 5);
        assert_eq!(doc.query_all(&Selector::class("stat-number")).len(), 3);
        assert_eq!(doc.query_all(&Selector::tag("img").with_attr("data-src")).len(), 4);
    }

    #[test]
    fn test_nav_links_resolve() {
        let doc = salon_page();
        for link in doc.query_all(&Selector::class("nav-link")) {
            let href = doc.attr(link, "href").unwrap();
            assert!(doc.element_by_id(&href[1..]).is_some(), "dangling {}", href);
        }
    }

    #[test]
    fn test_sections_are_stacked() {
        let doc = salon_page();
        let services = doc.element_by_id("services").unwrap();
        let contact = doc.element_by_id("contact").unwrap();
        assert_eq!(doc.rect(services).top, 800.0);
        assert_eq!(doc.rect(contact).top, 4000.0);
    }
}
