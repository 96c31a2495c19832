use carousel_core::{CarouselStatus, CarouselViewModel, Position, SlideView};

const PREV_ARROW: &str = "<";
const NEXT_ARROW: &str = ">";

/// Renders the view model as terminal text.
pub fn render(view: &CarouselViewModel, view_all_url: &str) -> String {
    let mut lines = Vec::new();
    if !view.title.trim().is_empty() {
        lines.push(format!("== {} ==", view.title.trim()));
    }

    match &view.status {
        CarouselStatus::Ready => {
            for slide in &view.slides {
                lines.extend(render_slide(slide));
            }
            lines.push(render_controls(view));
        }
        status => {
            if let Some(message) = status.message() {
                lines.push(message);
            }
        }
    }

    lines.push(format!("Alle Nachrichten anzeigen: {view_all_url}"));
    lines.join("\n")
}

fn render_slide(slide: &SlideView) -> Vec<String> {
    let marker = match slide.position {
        Position::Current => "*",
        Position::Prev | Position::Next => " ",
    };
    let mut lines = vec![format!(
        "{marker} [{}] {} ({})",
        slide.position.label(),
        slide.title,
        slide.published
    )];
    if !slide.description.is_empty() {
        lines.push(format!("    {}", slide.description));
    }
    lines.push(format!("    Bild: {}", slide.image_url));
    lines
}

fn render_controls(view: &CarouselViewModel) -> String {
    let dots = view
        .dots
        .iter()
        .map(|dot| {
            if dot.active {
                format!("[{}]", dot.index + 1)
            } else {
                format!(" {} ", dot.index + 1)
            }
        })
        .collect::<String>();
    let state = if view.is_paused { "pausiert" } else { "läuft" };
    if view.show_arrows {
        format!("{PREV_ARROW} {dots} {NEXT_ARROW}  ({state})")
    } else {
        format!("{dots}  ({state})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carousel_core::{DotView, EMPTY_MESSAGE, LOADING_MESSAGE};

    const ALL: &str = "https://contoso.example/_layouts/15/news.aspx";

    fn slide(title: &str, position: Position, slide_index: usize) -> SlideView {
        SlideView {
            item_id: slide_index as i64,
            title: title.to_string(),
            description: String::new(),
            image_url: "https://contoso.example/a.png".to_string(),
            page_url: "https://contoso.example/SitePages/a.aspx".to_string(),
            published: "03.07.2025".to_string(),
            position,
            slide_index,
        }
    }

    fn view(status: CarouselStatus) -> CarouselViewModel {
        CarouselViewModel {
            title: "Aktuelles".to_string(),
            status,
            slides: Vec::new(),
            dots: Vec::new(),
            is_paused: true,
            show_arrows: true,
        }
    }

    #[test]
    fn status_messages_replace_slides() {
        let loading = render(&view(CarouselStatus::Loading), ALL);
        assert!(loading.contains(LOADING_MESSAGE));

        let empty = render(&view(CarouselStatus::Empty), ALL);
        assert!(empty.contains(EMPTY_MESSAGE));
        assert!(empty.ends_with(ALL));
    }

    #[test]
    fn ready_view_lists_slides_and_dots() {
        let mut model = view(CarouselStatus::Ready);
        model.slides = vec![
            slide("Umzug", Position::Prev, 2),
            slide("Sommerfest", Position::Current, 0),
            slide("Neu im Team", Position::Next, 1),
        ];
        model.dots = (0..3)
            .map(|index| DotView {
                index,
                active: index == 0,
            })
            .collect();

        let text = render(&model, ALL);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "== Aktuelles ==");
        assert_eq!(lines[1], "  [prev] Umzug (03.07.2025)");
        assert_eq!(lines[3], "* [current] Sommerfest (03.07.2025)");
        assert!(text.contains("< [1] 2  3  >  (pausiert)"));
    }
}
