use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{window, MouseEvent, Storage, Window};
use yew::prelude::*;

use crate::display::{
    continuous_mode, DisplayMode, DisplayPolicy, OneShotHero, ONE_SHOT_FALLBACK_DELAY_MS,
};
use crate::profile;
use crate::timeline::{Category, CategoryFilter, TimelineEntry, TimelineModel};

const THEME_KEY: &str = "timeline-portfolio-theme";

#[derive(Clone, Copy, PartialEq, Eq)]
enum Theme {
    Light,
    Dark,
}

impl Theme {
    fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    fn from_str(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Self::Light => "◐",
            Self::Dark => "◑",
        }
    }

    fn toggle_label(self) -> String {
        format!("Switch to {} theme", self.toggled().as_str())
    }

    fn resolve() -> Self {
        let stored = local_storage()
            .and_then(|storage| storage.get_item(THEME_KEY).ok().flatten())
            .and_then(|value| Self::from_str(&value));

        stored.unwrap_or_else(|| {
            if system_prefers_dark() {
                Self::Dark
            } else {
                Self::Light
            }
        })
    }

    fn apply(self) {
        if let Some(root) = window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
        {
            let _ = root.set_attribute("data-theme", self.as_str());
        }
    }

    fn persist(self) {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(THEME_KEY, self.as_str());
        }
    }
}

fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok().flatten()
}

fn system_prefers_dark() -> bool {
    window()
        .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

fn scroll_offset() -> f64 {
    window().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0)
}

fn scrollable_height() -> f64 {
    let Some(win) = window() else {
        return 0.0;
    };

    let document_height = win
        .document()
        .and_then(|d| d.document_element())
        .map(|root| f64::from(root.scroll_height()))
        .unwrap_or(0.0);
    let viewport_height = win
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);

    (document_height - viewport_height).max(0.0)
}

struct ScrollListener {
    target: Window,
    callback: Closure<dyn FnMut()>,
}

impl ScrollListener {
    fn attach(callback: Closure<dyn FnMut()>) -> Option<Self> {
        let target = window()?;
        target
            .add_event_listener_with_callback("scroll", callback.as_ref().unchecked_ref())
            .ok()?;

        Some(Self { target, callback })
    }
}

impl Drop for ScrollListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback("scroll", self.callback.as_ref().unchecked_ref());
    }
}

struct FallbackTimer {
    target: Window,
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

impl FallbackTimer {
    fn schedule(callback: Closure<dyn FnMut()>, delay_ms: u32) -> Option<Self> {
        let target = window()?;
        let handle = target
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                delay_ms as i32,
            )
            .ok()?;

        Some(Self {
            target,
            handle,
            _callback: callback,
        })
    }
}

impl Drop for FallbackTimer {
    fn drop(&mut self) {
        self.target.clear_timeout_with_handle(self.handle);
    }
}

struct HeroSubscriptions {
    _scroll: Option<ScrollListener>,
    _timer: Option<FallbackTimer>,
}

impl HeroSubscriptions {
    fn none() -> Self {
        Self {
            _scroll: None,
            _timer: None,
        }
    }

    fn continuous(mode: UseStateHandle<DisplayMode>) -> Self {
        let callback = Closure::<dyn FnMut()>::new(move || {
            mode.set(continuous_mode(scroll_offset(), scrollable_height()));
        });

        Self {
            _scroll: ScrollListener::attach(callback),
            _timer: None,
        }
    }

    fn one_shot(mode: UseStateHandle<DisplayMode>) -> Self {
        let hero = Rc::new(RefCell::new(OneShotHero::new()));

        let scroll_callback = {
            let hero = Rc::clone(&hero);
            let mode = mode.clone();
            Closure::<dyn FnMut()>::new(move || {
                if hero.borrow_mut().record_scroll(scroll_offset()) {
                    mode.set(DisplayMode::Compact);
                }
            })
        };

        let timer_callback = Closure::<dyn FnMut()>::new(move || {
            if hero.borrow_mut().record_fallback_elapsed() {
                mode.set(DisplayMode::Compact);
            }
        });

        Self {
            _scroll: ScrollListener::attach(scroll_callback),
            _timer: FallbackTimer::schedule(timer_callback, ONE_SHOT_FALLBACK_DELAY_MS),
        }
    }
}

fn category_glyph(category: Category) -> &'static str {
    match category {
        Category::Work => "■",
        Category::Education => "◆",
        Category::ExternalRepo => "↗",
        Category::ModelHub => "◈",
    }
}

fn category_glyph_class(category: Category) -> &'static str {
    match category {
        Category::Work => "glyph-work",
        Category::Education => "glyph-education",
        Category::ExternalRepo => "glyph-external-repo",
        Category::ModelHub => "glyph-model-hub",
    }
}

#[derive(Properties, PartialEq)]
struct HeroPanelProps {
    mode: DisplayMode,
}

#[function_component(HeroPanel)]
fn hero_panel(props: &HeroPanelProps) -> Html {
    let intro = props.mode.is_introductory();
    let panel_class = classes!(
        "hero-panel",
        if intro {
            "hero-panel-intro"
        } else {
            "hero-panel-compact"
        }
    );
    let avatar_class = classes!(
        "hero-avatar",
        if intro {
            "hero-avatar-intro"
        } else {
            "hero-avatar-compact"
        }
    );

    html! {
        <section class={panel_class} aria-labelledby="identity-heading">
            <div class="hero-body">
                <div class={avatar_class} aria-hidden="true">{profile::INITIALS}</div>
                <div class="hero-copy">
                    <h1 id="identity-heading">{profile::NAME}</h1>
                    <p class="hero-blurb">{profile::BLURB}</p>
                    <div class="social-row">
                        <a
                            class="social-button social-linkedin"
                            href={profile::LINKEDIN_URL}
                            target="_blank"
                            rel="noopener noreferrer"
                            aria-label="LinkedIn profile"
                        >
                            {"in"}
                        </a>
                        <a
                            class="social-button social-github"
                            href={profile::GITHUB_URL}
                            target="_blank"
                            rel="noopener noreferrer"
                            aria-label="GitHub profile"
                        >
                            {"gh"}
                        </a>
                        <a
                            class="social-button social-model-hub"
                            href={profile::MODEL_HUB_URL}
                            target="_blank"
                            rel="noopener noreferrer"
                            aria-label="Model hub profile"
                        >
                            {"hf"}
                        </a>
                    </div>
                </div>
            </div>
            if intro {
                <div class="scroll-hint">
                    <p>{profile::SCROLL_HINT}</p>
                    <span class="scroll-hint-arrow" aria-hidden="true">{"▼"}</span>
                </div>
            }
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct FilterBarProps {
    active: CategoryFilter,
    on_select: Callback<CategoryFilter>,
}

#[function_component(FilterBar)]
fn filter_bar(props: &FilterBarProps) -> Html {
    let choices = std::iter::once(CategoryFilter::All)
        .chain(Category::ALL.into_iter().map(CategoryFilter::Only));

    html! {
        <div class="filter-bar" role="group" aria-label="Filter timeline entries">
            { for choices.map(|choice| {
                let onclick = {
                    let on_select = props.on_select.clone();
                    Callback::from(move |_: MouseEvent| on_select.emit(choice))
                };
                let class = classes!(
                    "filter-badge",
                    (props.active == choice).then_some("is-active")
                );

                html! {
                    <button type="button" {class} {onclick}>{choice.label()}</button>
                }
            })}
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct TimelineRowProps {
    entry: TimelineEntry,
    position: usize,
    expanded: bool,
    summary: String,
    show_link: bool,
    on_enter: Callback<usize>,
    on_leave: Callback<()>,
}

#[function_component(TimelineRow)]
fn timeline_row(props: &TimelineRowProps) -> Html {
    let onmouseenter = {
        let on_enter = props.on_enter.clone();
        let position = props.position;
        Callback::from(move |_: MouseEvent| on_enter.emit(position))
    };

    let onmouseleave = {
        let on_leave = props.on_leave.clone();
        Callback::from(move |_: MouseEvent| on_leave.emit(()))
    };

    let row_class = classes!(
        "timeline-row",
        (props.position % 2 == 1).then_some("timeline-row-reverse")
    );
    let card_class = classes!("timeline-card", props.expanded.then_some("is-expanded"));

    html! {
        <div class={row_class}>
            <div class="timeline-slot">
                <article class={card_class} {onmouseenter} {onmouseleave}>
                    <h3 class="entry-title">
                        <span>{props.entry.title.clone()}</span>
                        <span
                            class={classes!("entry-glyph", category_glyph_class(props.entry.category))}
                            aria-hidden="true"
                        >
                            {category_glyph(props.entry.category)}
                        </span>
                    </h3>
                    <p class="entry-meta">
                        {format!("{} | {}", props.entry.organization, props.entry.period)}
                    </p>
                    <p class="entry-summary">{props.summary.clone()}</p>
                    if !props.entry.tags.is_empty() {
                        <ul class="tag-list">
                            { for props.entry.tags.iter().map(|tag| html! {
                                <li class="tag-badge">{tag.clone()}</li>
                            })}
                        </ul>
                    }
                    if props.show_link {
                        <a
                            class="entry-link"
                            href={props.entry.external_link.clone().unwrap_or_default()}
                            target="_blank"
                            rel="noopener noreferrer"
                        >
                            {"View project"}
                            <span class="external-mark" aria-hidden="true">{"↗"}</span>
                        </a>
                    }
                </article>
            </div>
            <div class="timeline-node-slot">
                <span class="timeline-node"></span>
            </div>
            <div class="timeline-slot"></div>
        </div>
    }
}

#[function_component(App)]
fn app() -> Html {
    let theme = use_state(Theme::resolve);
    let mode = use_state_eq(|| DisplayMode::Introductory);
    let model = use_state(|| TimelineModel::new(profile::timeline_entries()));

    {
        let current = *theme;
        use_effect_with((), move |_| {
            current.apply();
            || ()
        });
    }

    {
        let mode = mode.clone();
        use_effect_with((), move |_| {
            let subscriptions = match profile::HERO_POLICY {
                DisplayPolicy::Continuous => HeroSubscriptions::continuous(mode),
                DisplayPolicy::OneShot => HeroSubscriptions::none(),
            };

            move || drop(subscriptions)
        });
    }

    {
        let mode = mode.clone();
        use_effect_with(*mode, move |current| {
            let subscriptions = if profile::HERO_POLICY == DisplayPolicy::OneShot
                && current.is_introductory()
            {
                HeroSubscriptions::one_shot(mode)
            } else {
                HeroSubscriptions::none()
            };

            move || drop(subscriptions)
        });
    }

    let on_toggle_theme = {
        let theme = theme.clone();
        Callback::from(move |_: MouseEvent| {
            let next = (*theme).toggled();
            next.persist();
            next.apply();
            theme.set(next);
        })
    };

    let on_filter_select = {
        let model = model.clone();
        Callback::from(move |filter: CategoryFilter| {
            let mut next = (*model).clone();
            next.set_filter(filter);
            model.set(next);
        })
    };

    let on_entry_enter = {
        let model = model.clone();
        Callback::from(move |position: usize| {
            let mut next = (*model).clone();
            next.set_expanded(Some(position));
            model.set(next);
        })
    };

    let on_entry_leave = {
        let model = model.clone();
        Callback::from(move |_: ()| {
            let mut next = (*model).clone();
            next.set_expanded(None);
            model.set(next);
        })
    };

    let visible: Vec<TimelineEntry> = model.visible_entries().into_iter().cloned().collect();

    html! {
        <div class="page-shell">
            <header class="site-header">
                <button
                    class="theme-toggle"
                    type="button"
                    aria-label={(*theme).toggle_label()}
                    onclick={on_toggle_theme}
                >
                    <span aria-hidden="true">{(*theme).icon()}</span>
                </button>
            </header>

            <HeroPanel mode={*mode} />

            <main class="timeline-section">
                <h2 class="timeline-heading">{profile::TIMELINE_HEADING}</h2>
                <FilterBar active={model.filter()} on_select={on_filter_select} />
                <div class="timeline">
                    <div class="timeline-spine" aria-hidden="true"></div>
                    { for visible.iter().enumerate().map(|(position, entry)| html! {
                        <TimelineRow
                            key={position}
                            entry={entry.clone()}
                            position={position}
                            expanded={model.is_expanded(position)}
                            summary={model.summary_for(position)}
                            show_link={model.shows_external_link(position)}
                            on_enter={on_entry_enter.clone()}
                            on_leave={on_entry_leave.clone()}
                        />
                    })}
                </div>
            </main>
        </div>
    }
}

pub fn run() {
    yew::Renderer::<App>::with_root(
        window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("app"))
            .expect("missing #app mount point"),
    )
    .render();
}
