use std::{collections::BTreeSet, process::ExitCode, rc::Rc, time::Duration};

use clap::Parser;
use log::{error, info, warn};

use gramsynth::{
    constraint::Constraint,
    eval::{Bindings, Evaluator},
    grammar::{Grammar, Rule},
    ops,
    oracle::{Example, ExampleOracle},
    search::{Search, SearchConfig},
    symbol::Symbol,
    synth::enumerative::EnumerativeSynth,
    tree::{Node, Tree},
};

/// Enumerative synthesis of integer programs from input/output examples.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Seconds to search for before giving up
    #[arg(short, long, default_value_t = 0.5)]
    timeout: f64,

    /// Maximum nesting depth of candidate programs
    #[arg(short = 'd', long)]
    max_depth: Option<usize>,

    /// Keep reporting correct programs until the timeout
    #[arg(short, long)]
    all: bool,

    /// An example such as `x=0,y=1 -> -1`. May be repeated
    #[arg(short, long = "example")]
    examples: Vec<Example>,
}

fn default_examples() -> Vec<Example> {
    vec![
        Example::new([("x", 0), ("y", 1)], -1),
        Example::new([("x", 4), ("y", 1)], 3),
        Example::new([("x", 1), ("y", 4)], 3),
        Example::new([("x", 2), ("y", 2)], 3),
    ]
}

fn build_grammar(eval: &Rc<Evaluator>, vars: &BTreeSet<String>) -> Grammar {
    let a = Symbol::new("A");
    let val = Symbol::new("val");
    let mut g = Grammar::new(a.clone());

    let nonzero = Constraint::does_not_evaluate_to(0, Rc::clone(eval), Bindings::new());
    let notone = Constraint::does_not_evaluate_to(1, Rc::clone(eval), Bindings::new());

    g.extend(vars.iter().map(|var| Rule::new(val.clone(), Tree::var(var))));
    g.extend([0, 1, -1].map(|x| Rule::new(val.clone(), Tree::int(x))));

    let a_nonzero = Tree::from(Symbol::itself().with(nonzero.clone()));
    let a_factor = Tree::from(Symbol::itself().with(notone).with(nonzero));
    let a_any = Tree::from(Symbol::itself());

    g.add_rule(Rule::new(a.clone(), val))
        .add_rule(Rule::constrained(
            a.clone(),
            Node::symmetric("add", [a_nonzero.clone(), a_nonzero.clone()]),
            [Constraint::DistinctChildren, Constraint::Dynamic],
        ))
        .add_rule(Rule::constrained(
            a.clone(),
            Node::symmetric("mul", [a_factor.clone(), a_factor]),
            [Constraint::Dynamic],
        ))
        .add_rule(Rule::constrained(
            a.clone(),
            Node::new("sub", [a_any.clone(), a_nonzero]),
            [Constraint::DistinctChildren, Constraint::Dynamic],
        ))
        .add_rule(Rule::constrained(
            a,
            Node::new("ite", [a_any.clone(), a_any.clone(), a_any]),
            [Constraint::Dynamic],
        ));

    g
}

fn main() -> ExitCode {
    colog::init();

    let args = Args::parse();
    let examples = if args.examples.is_empty() {
        default_examples()
    } else {
        args.examples
    };
    let config = SearchConfig {
        timeout: Duration::from_secs_f64(args.timeout.max(0.0)),
        stop_at_first: !args.all,
    };

    let eval = Rc::new(ops::arithmetic());
    let vars = examples.iter()
        .flat_map(|ex| ex.input.keys().cloned())
        .collect::<BTreeSet<_>>();
    let grammar = build_grammar(&eval, &vars);

    for name in grammar.undefined_symbols() {
        warn!("Symbol {name} has no rules");
    }

    info!("Running synthesis on {grammar}");
    info!("With in-out examples:");
    for example in &examples {
        info!("  {example}");
    }

    let synth = EnumerativeSynth::new(&grammar, args.max_depth);
    let oracle = ExampleOracle::new(eval, examples);
    let mut search = Search::new(synth, oracle, config);

    match search.run() {
        Ok(found) if found.is_empty() => {
            info!("No program found (reached depth {})", search.synth().depth());
            ExitCode::FAILURE
        },
        Ok(found) => {
            for prog in found {
                println!("{prog}");
            }
            ExitCode::SUCCESS
        },
        Err(e) => {
            error!("Search aborted: {e}");
            ExitCode::FAILURE
        },
    }
}
