use colored::Colorize;
use lazy_static::lazy_static;

lazy_static! {
    pub static ref CODIUM: String =
        "[ Codium Viewer ]".bold().truecolor(230, 0, 122).to_string();
    pub static ref CODE_ONLY: String =
        "(code only)".white().dimmed().italic().to_string();
    pub static ref HELP: String = [
        "commands:",
        "  type <text>    insert text at the caret",
        "  code <text>    replace the whole editor buffer",
        "  check          run the lesson validator",
        "  reset          restore the starter code",
        "  solution       show the solution code",
        "  yes | no       answer the pending question",
        "  goto <n>       open lesson n",
        "  next | prev    move through the course",
        "  quit           leave the viewer",
    ]
    .join("\n")
    .white()
    .dimmed()
    .to_string();
}
