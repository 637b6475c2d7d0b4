fn main() {
  training_planner_lib::run()
}
