use std::rc::Rc;

use log::warn;
use web_sys::{Element, MouseEvent};
use yew::prelude::*;
use yew_hooks::prelude::*;

use crate::config;
use crate::journey::dom::DomObserver;
use crate::journey::registry::{ColorTag, StepDescriptor, StepIcon, StepRegistry};
use crate::journey::render::{render, ConnectorState, VisualState};
use crate::journey::session::{JourneyEvent, JourneySession};
use crate::journey::visibility::{IntersectionNotice, RevealPolicy, RevealedSet};

type Session = JourneySession<DomObserver>;

struct ColorClasses {
    border: &'static str,
    text: &'static str,
    tint: &'static str,
    glow: &'static str,
}

fn color_classes(tag: ColorTag) -> ColorClasses {
    match tag {
        ColorTag::Primary => ColorClasses {
            border: "border-primary",
            text: "text-primary",
            tint: "tint-primary",
            glow: "glow-primary",
        },
        ColorTag::Secondary => ColorClasses {
            border: "border-secondary",
            text: "text-secondary",
            tint: "tint-secondary",
            glow: "glow-secondary",
        },
        ColorTag::Accent => ColorClasses {
            border: "border-accent",
            text: "text-accent",
            tint: "tint-accent",
            glow: "glow-accent",
        },
    }
}

fn icon_glyph(icon: StepIcon) -> &'static str {
    match icon {
        StepIcon::Calculator => "🧮",
        StepIcon::Cpu => "💻",
        StepIcon::Wrench => "🔧",
        StepIcon::Flask => "🧪",
    }
}

fn step_class(state: &VisualState) -> &'static str {
    if state.revealed {
        "journey-step entered"
    } else {
        "journey-step waiting"
    }
}

fn connector_class(connector: &ConnectorState) -> &'static str {
    if connector.emphasized {
        "journey-line emphasized"
    } else {
        "journey-line"
    }
}

#[derive(Properties, PartialEq)]
pub struct LearningJourneyProps {
    pub registry: Rc<StepRegistry>,
}

#[function_component(LearningJourney)]
pub fn learning_journey(props: &LearningJourneyProps) -> Html {
    let session = use_mut_ref(|| None::<Session>);
    let update = use_update();
    let step_refs = use_memo(
        |count| (0..*count).map(|_| NodeRef::default()).collect::<Vec<NodeRef>>(),
        props.registry.len(),
    );

    // Everything the session acquires is released by the cleanup, and by
    // its own drop if setup bails out halfway.
    {
        let session = session.clone();
        let update = update.clone();
        let step_refs = step_refs.clone();
        use_effect_with_deps(
            move |registry: &Rc<StepRegistry>| {
                let on_notices = {
                    let session = session.clone();
                    let update = update.clone();
                    Callback::from(move |notices: Vec<IntersectionNotice>| {
                        let changed = match session.borrow_mut().as_mut() {
                            Some(active) => notices.into_iter().fold(false, |changed, notice| {
                                active.apply(JourneyEvent::Intersection(notice)) || changed
                            }),
                            None => false,
                        };
                        if changed {
                            update();
                        }
                    })
                };

                let policy = RevealPolicy::default();
                let backend = match DomObserver::new(&policy, on_notices) {
                    Ok(observer) => Some(observer),
                    Err(e) => {
                        warn!("Could not create intersection observer: {:?}", e);
                        None
                    }
                };

                let mut active = Session::new(registry.clone(), policy, backend);
                for (step, node) in step_refs.iter().enumerate() {
                    if let Some(element) = node.cast::<Element>() {
                        active.attach(step, element);
                    }
                }
                *session.borrow_mut() = Some(active);
                update();

                move || {
                    let released = session.borrow_mut().take();
                    if let Some(mut active) = released {
                        active.detach_all();
                    }
                }
            },
            props.registry.clone(),
        );
    }

    let dispatch = {
        let session = session.clone();
        let update = update.clone();
        Callback::from(move |event: JourneyEvent| {
            let changed = session
                .borrow_mut()
                .as_mut()
                .map_or(false, |active| active.apply(event));
            if changed {
                update();
            }
        })
    };

    let (states, connector) = match session.borrow().as_ref() {
        Some(active) => (active.visual_states(), active.connector()),
        None => {
            let idle = RevealedSet::new();
            (
                props.registry.iter().map(|step| (step.index, render(step, &idle, None))).collect(),
                ConnectorState { emphasized: false },
            )
        }
    };

    html! {
        <section id="learning-journey" class="journey-section">
            <style>
                {r#"
                    .journey-section {
                        --journey-primary: 199, 89%, 60%;
                        --journey-secondary: 262, 83%, 66%;
                        --journey-accent: 330, 81%, 62%;
                        padding: 6rem 1rem;
                        background: rgba(255, 255, 255, 0.02);
                    }
                    .journey-inner {
                        max-width: 56rem;
                        margin: 0 auto;
                    }
                    .journey-section h2 {
                        font-size: 2.25rem;
                        font-weight: 700;
                        text-align: center;
                        margin-bottom: 1rem;
                    }
                    .journey-section h2 span {
                        background: linear-gradient(90deg, hsl(var(--journey-primary)), hsl(var(--journey-accent)));
                        -webkit-background-clip: text;
                        color: transparent;
                    }
                    .journey-subtitle {
                        text-align: center;
                        color: #999;
                        margin: 0 auto 4rem;
                        max-width: 42rem;
                    }
                    .journey-track {
                        position: relative;
                    }
                    .journey-line {
                        position: absolute;
                        left: 2rem;
                        top: 0;
                        bottom: 0;
                        width: 1px;
                        background: linear-gradient(to bottom, hsl(var(--journey-primary)), hsl(var(--journey-secondary)), hsl(var(--journey-accent)));
                        opacity: 0.3;
                        transition: opacity 0.3s;
                    }
                    .journey-line.emphasized {
                        opacity: 0.6;
                    }
                    .journey-steps {
                        display: flex;
                        flex-direction: column;
                        gap: 4rem;
                    }
                    .journey-step {
                        position: relative;
                        display: flex;
                        align-items: flex-start;
                        gap: 1.5rem;
                        transition: opacity 0.7s, transform 0.7s;
                    }
                    .journey-step.waiting {
                        opacity: 0;
                        transform: translateX(-2.5rem);
                    }
                    .journey-step.entered {
                        opacity: 1;
                        transform: translateX(0);
                    }
                    .journey-node {
                        position: relative;
                        z-index: 1;
                        flex-shrink: 0;
                        width: 4rem;
                        height: 4rem;
                        border-radius: 50%;
                        border: 2px solid;
                        background: #111;
                        display: flex;
                        align-items: center;
                        justify-content: center;
                        font-size: 1.6rem;
                        transition: transform 0.3s, box-shadow 0.3s;
                    }
                    .journey-node.active {
                        transform: scale(1.1);
                    }
                    .journey-card {
                        flex: 1;
                        padding: 1.5rem;
                        border-radius: 0.75rem;
                        border: 1px solid rgba(255, 255, 255, 0.1);
                        background: rgba(255, 255, 255, 0.03);
                        transition: transform 0.3s, border-color 0.3s, box-shadow 0.3s;
                    }
                    .journey-card.active {
                        transform: translateY(-0.25rem);
                    }
                    .journey-card header {
                        display: flex;
                        align-items: center;
                        gap: 0.75rem;
                        margin-bottom: 0.5rem;
                    }
                    .journey-number {
                        font-family: monospace;
                        font-size: 0.75rem;
                        color: #999;
                    }
                    .journey-card h3 {
                        font-size: 1.25rem;
                        font-weight: 600;
                        margin: 0;
                    }
                    .journey-description {
                        color: #aaa;
                        margin-bottom: 0.5rem;
                    }
                    .journey-detail {
                        overflow: hidden;
                        max-height: 0;
                        opacity: 0;
                        transition: max-height 0.3s, opacity 0.3s, margin 0.3s;
                    }
                    .journey-detail.expanded {
                        max-height: 4rem;
                        margin-top: 0.75rem;
                        opacity: 1;
                    }
                    .journey-detail p {
                        font-size: 0.875rem;
                        font-style: italic;
                    }
                    .border-primary { border-color: hsl(var(--journey-primary)) !important; }
                    .border-secondary { border-color: hsl(var(--journey-secondary)) !important; }
                    .border-accent { border-color: hsl(var(--journey-accent)) !important; }
                    .text-primary { color: hsl(var(--journey-primary)); }
                    .text-secondary { color: hsl(var(--journey-secondary)); }
                    .text-accent { color: hsl(var(--journey-accent)); }
                    .tint-primary { background: hsla(var(--journey-primary), 0.05); }
                    .tint-secondary { background: hsla(var(--journey-secondary), 0.05); }
                    .tint-accent { background: hsla(var(--journey-accent), 0.05); }
                    .glow-primary { box-shadow: 0 0 20px hsla(var(--journey-primary), 0.3); }
                    .glow-secondary { box-shadow: 0 0 20px hsla(var(--journey-secondary), 0.3); }
                    .glow-accent { box-shadow: 0 0 20px hsla(var(--journey-accent), 0.3); }
                    @media (min-width: 768px) {
                        .journey-section { padding: 8rem 1rem; }
                        .journey-section h2 { font-size: 2.5rem; }
                        .journey-line { left: 50%; }
                    }
                "#}
            </style>
            <div class="journey-inner">
                <h2>{"Learning "}<span>{"Journey"}</span></h2>
                <p class="journey-subtitle">{"A fundamentals-first approach to mastering AI/ML"}</p>
                <div class="journey-track">
                    <div class={connector_class(&connector)}></div>
                    <div class="journey-steps">
                        {
                            props.registry.iter().map(|step| {
                                let state = states
                                    .get(&step.index)
                                    .copied()
                                    .unwrap_or_else(|| render(step, &RevealedSet::new(), None));
                                let node_ref = step_refs.get(step.index).cloned().unwrap_or_default();
                                view_step(step, state, node_ref, &dispatch)
                            }).collect::<Html>()
                        }
                    </div>
                </div>
            </div>
        </section>
    }
}

fn view_step(step: &StepDescriptor, state: VisualState, node_ref: NodeRef, dispatch: &Callback<JourneyEvent>) -> Html {
    let colors = color_classes(step.color);
    let index = step.index;

    let onmouseenter = dispatch.reform(move |_: MouseEvent| JourneyEvent::PointerEnter(index));
    let onmouseleave = dispatch.reform(move |_: MouseEvent| JourneyEvent::PointerLeave(index));

    html! {
        <div
            key={index.to_string()}
            ref={node_ref}
            data-step={index.to_string()}
            data-color={step.color.as_str()}
            class={step_class(&state)}
            style={format!("transition-delay: {}ms;", config::transition_delay_ms(index))}
            {onmouseenter}
            {onmouseleave}
        >
            <div class={classes!("journey-node", colors.border, colors.text, state.hovered.then(|| "active"), state.hovered.then(|| colors.glow))}>
                {icon_glyph(step.icon)}
            </div>
            <div class={classes!("journey-card", state.hovered.then(|| "active"), state.hovered.then(|| colors.border), state.hovered.then(|| colors.glow), state.hovered.then(|| colors.tint))}>
                <header>
                    <span class="journey-number">{step.number_label()}</span>
                    <h3>{&step.title}</h3>
                </header>
                <p class="journey-description">{&step.description}</p>
                <div class={classes!("journey-detail", state.expanded.then(|| "expanded"))}>
                    <p class={colors.text}>{&step.detail}</p>
                </div>
            </div>
        </div>
    }
}
